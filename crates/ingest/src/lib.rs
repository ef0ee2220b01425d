//! # Listmatch Ingest
//!
//! Reads product catalogs and marketplace listings from JSON-lines sources
//! (one JSON object per line) and validates the fields the matcher needs.
//!
//! - Products require string `manufacturer` and `model`; `family` and
//!   `product_name` are optional.
//! - Listings require string `manufacturer` and `title`.
//! - A record without `id` gets its 1-based line number. Blank lines are
//!   skipped but still counted.
//!
//! The first malformed record aborts the whole load.
//!
//! ```rust
//! use ingest::read_products;
//!
//! let data = r#"{"product_name":"Canon_EOS_5D","manufacturer":"Canon","model":"EOS 5D"}
//! {"manufacturer":"Nikon","family":"Coolpix","model":"S6100"}"#;
//! let products = read_products(data.as_bytes()).unwrap();
//!
//! assert_eq!(products[0].id, "1");
//! assert_eq!(products[1].family.as_deref(), Some("Coolpix"));
//! ```
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use serde_json::Value;
use tracing::{info, warn, Level};

mod error;
mod fields;
mod types;

use crate::fields::{optional_string, record_id, required_string};

pub use crate::error::IngestError;
pub use crate::types::{ListingRecord, ProductRecord, RawRecord, RecordKind};

/// Read product records from a JSON-lines file.
pub fn load_products<P: AsRef<Path>>(path: P) -> Result<Vec<ProductRecord>, IngestError> {
    load(path.as_ref(), RecordKind::Product, product_from_raw)
}

/// Read listing records from a JSON-lines file.
pub fn load_listings<P: AsRef<Path>>(path: P) -> Result<Vec<ListingRecord>, IngestError> {
    load(path.as_ref(), RecordKind::Listing, listing_from_raw)
}

/// Read product records from any buffered reader.
pub fn read_products<R: BufRead>(reader: R) -> Result<Vec<ProductRecord>, IngestError> {
    read_records(reader, "<reader>", RecordKind::Product, product_from_raw)
}

/// Read listing records from any buffered reader.
pub fn read_listings<R: BufRead>(reader: R) -> Result<Vec<ListingRecord>, IngestError> {
    read_records(reader, "<reader>", RecordKind::Listing, listing_from_raw)
}

/// Validate a single product object. `line` is used for the fallback id and
/// for error messages.
pub fn product_from_raw(line: usize, raw: RawRecord) -> Result<ProductRecord, IngestError> {
    let kind = RecordKind::Product;
    let id = record_id(kind, line, &raw)?;
    Ok(ProductRecord {
        id,
        manufacturer: required_string(kind, line, &raw, "manufacturer")?,
        family: optional_string(kind, line, &raw, "family")?,
        model: required_string(kind, line, &raw, "model")?,
        product_name: optional_string(kind, line, &raw, "product_name")?,
    })
}

/// Validate a single listing object. `line` is used for the fallback id and
/// for error messages.
pub fn listing_from_raw(line: usize, raw: RawRecord) -> Result<ListingRecord, IngestError> {
    let kind = RecordKind::Listing;
    let id = record_id(kind, line, &raw)?;
    let manufacturer = required_string(kind, line, &raw, "manufacturer")?;
    let title = required_string(kind, line, &raw, "title")?;
    Ok(ListingRecord {
        id,
        manufacturer,
        title,
        raw,
    })
}

fn load<T>(
    path: &Path,
    kind: RecordKind,
    parse: fn(usize, RawRecord) -> Result<T, IngestError>,
) -> Result<Vec<T>, IngestError> {
    let origin = path.display().to_string();
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: origin.clone(),
        source,
    })?;
    read_records(BufReader::new(file), &origin, kind, parse)
}

fn read_records<R: BufRead, T>(
    reader: R,
    origin: &str,
    kind: RecordKind,
    parse: fn(usize, RawRecord) -> Result<T, IngestError>,
) -> Result<Vec<T>, IngestError> {
    let start = Instant::now();
    let span = tracing::span!(Level::INFO, "ingest.load", origin = %origin, kind = %kind);
    let _guard = span.enter();

    match read_inner(reader, origin, kind, parse) {
        Ok(records) => {
            info!(
                records = records.len(),
                elapsed_micros = start.elapsed().as_micros(),
                "load_success"
            );
            Ok(records)
        }
        Err(err) => {
            warn!(
                error = %err,
                elapsed_micros = start.elapsed().as_micros(),
                "load_failure"
            );
            Err(err)
        }
    }
}

fn read_inner<R: BufRead, T>(
    reader: R,
    origin: &str,
    kind: RecordKind,
    parse: fn(usize, RawRecord) -> Result<T, IngestError>,
) -> Result<Vec<T>, IngestError> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|source| IngestError::Io {
            path: origin.to_string(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value =
            serde_json::from_str(&line).map_err(|err| IngestError::InvalidJson {
                kind,
                line: line_no,
                message: err.to_string(),
            })?;
        let Value::Object(raw) = value else {
            return Err(IngestError::NotAnObject {
                kind,
                line: line_no,
            });
        };
        records.push(parse(line_no, raw)?);
    }
    Ok(records)
}

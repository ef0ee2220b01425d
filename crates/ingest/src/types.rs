//! Record types handed from the ingest stage to the matcher.
//!
//! ```text
//! JSON line ──parse──▶ serde_json::Map ──validate──▶ ProductRecord
//!                                                  └▶ ListingRecord
//! ```
//!
//! Listing records keep the original JSON object so the result sink can
//! echo it back verbatim.
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw, field-name-keyed record as read from one JSON line.
pub type RawRecord = Map<String, Value>;

/// Which corpus a record belongs to. Used in error messages and log fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Product,
    Listing,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Product => f.write_str("product"),
            RecordKind::Listing => f.write_str("listing"),
        }
    }
}

/// A validated catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductRecord {
    /// Source id, or the 1-based line number when the source had none.
    pub id: String,
    pub manufacturer: String,
    /// `None` when the field was absent or `null`.
    pub family: Option<String>,
    pub model: String,
    /// Display name used to group results; optional in the source.
    pub product_name: Option<String>,
}

/// A validated marketplace listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingRecord {
    /// Source id, or the 1-based line number when the source had none.
    pub id: String,
    pub manufacturer: String,
    pub title: String,
    /// The record exactly as read. A synthesized id is not inserted here.
    pub raw: RawRecord,
}

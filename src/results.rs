//! Result sink: resolved listings grouped by product.
use std::collections::BTreeMap;
use std::io::{self, Write};

use ingest::RawRecord;
use matcher::MatchOutcome;
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(serde::Serialize)]
struct ResultLine<'a> {
    product_name: &'a str,
    listings: Vec<EchoedListing<'a>>,
}

/// A listing record as read, minus its `id`.
struct EchoedListing<'a>(&'a RawRecord);

impl Serialize for EchoedListing<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.0.iter().filter(|(key, _)| key.as_str() != "id");
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Write one JSON line per product that resolved at least one listing.
///
/// Lines are sorted by product name, and each line's listings keep listing
/// order. Listings are echoed as they were read, in their original key
/// order, except that `id` is always dropped. Returns the number of lines
/// written.
pub fn write_results<W: Write>(outcome: &MatchOutcome, mut out: W) -> io::Result<usize> {
    let mut groups: BTreeMap<&str, Vec<EchoedListing<'_>>> = BTreeMap::new();
    for (product, listing) in outcome.resolved() {
        groups
            .entry(product.display_name())
            .or_default()
            .push(EchoedListing(&listing.raw));
    }
    let lines = groups.len();
    for (product_name, listings) in groups {
        let line = ResultLine {
            product_name,
            listings,
        };
        serde_json::to_writer(&mut out, &line)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(lines)
}

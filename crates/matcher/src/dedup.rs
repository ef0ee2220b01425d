//! Catalog deduplication.
//!
//! Two products are duplicates when manufacturer, family (if any) and model
//! agree after lowercasing and dropping everything but ASCII letters and
//! digits. The first product in input order wins.
use std::collections::HashSet;

use canonical::strip_key;

use crate::types::Product;

/// Relaxed identity key of a product.
///
/// Stripped values contain no spaces, so joining with a space cannot make
/// two different value lists collide. A missing family contributes no
/// component at all, which keeps "no family" distinct from an empty one.
pub fn dedup_key(product: &Product) -> String {
    let mut parts = vec![strip_key(&product.manufacturer)];
    if let Some(family) = &product.family {
        parts.push(strip_key(family));
    }
    parts.push(strip_key(&product.model));
    parts.join(" ")
}

/// Keep the first product for every key, preserving input order.
pub fn dedupe(products: Vec<Product>) -> Vec<Product> {
    let mut seen = HashSet::with_capacity(products.len());
    products
        .into_iter()
        .filter(|product| seen.insert(dedup_key(product)))
        .collect()
}

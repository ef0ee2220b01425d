use serde::Serialize;

use crate::summary::RunSummary;
use crate::types::{Listing, ListingId, ListingSlot, Product, ProductId};

/// Everything a run produced: the deduplicated catalog, the listing arena,
/// one [`ListingSlot`] per listing, and the run summary.
///
/// Downstream sinks only read from this.
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub(crate) products: Vec<Product>,
    pub(crate) listings: Vec<Listing>,
    pub(crate) slots: Vec<ListingSlot>,
    pub(crate) summary: RunSummary,
}

impl MatchOutcome {
    /// Products that survived deduplication, indexed by [`ProductId`].
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Listings in input order, indexed by [`ListingId`].
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn slots(&self) -> &[ListingSlot] {
        &self.slots
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn product(&self, id: ProductId) -> &Product {
        &self.products[id.0]
    }

    pub fn listing(&self, id: ListingId) -> &Listing {
        &self.listings[id.0]
    }

    pub fn slot(&self, id: ListingId) -> &ListingSlot {
        &self.slots[id.0]
    }

    /// Candidate products of a listing, in product order.
    pub fn candidates(&self, id: ListingId) -> impl Iterator<Item = &Product> + '_ {
        self.slots[id.0].candidates.iter().map(|&p| self.product(p))
    }

    pub fn best_candidate(&self, id: ListingId) -> Option<&Product> {
        self.slots[id.0].best_candidate.map(|p| self.product(p))
    }

    /// Every listing with a best candidate, as `(product, listing)` pairs in
    /// listing order.
    pub fn resolved(&self) -> impl Iterator<Item = (&Product, &Listing)> + '_ {
        self.listings
            .iter()
            .zip(&self.slots)
            .filter_map(|(listing, slot)| slot.best_candidate.map(|p| (self.product(p), listing)))
    }

    /// `(id, listing, slot)` triples in listing order.
    pub fn iter(&self) -> impl Iterator<Item = (ListingId, &Listing, &ListingSlot)> + '_ {
        self.listings
            .iter()
            .zip(&self.slots)
            .enumerate()
            .map(|(i, (listing, slot))| (ListingId(i), listing, slot))
    }
}

use std::cmp::Ordering;
use std::time::Instant;

use canonical::Token;
use index::TokenIndex;
use rayon::prelude::*;
use tracing::{debug, info, Level};

use crate::dedup::dedupe;
use crate::metrics::metrics_recorder;
use crate::outcome::MatchOutcome;
use crate::policy::MatchPolicy;
use crate::summary::{CandidateCounts, RunSummary};
use crate::types::{
    Listing, ListingId, ListingSlot, MatchConfig, MatchError, Product, ProductId, Traversal,
};

#[cfg(test)]
mod tests;

/// Listing field an index is built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingField {
    Manufacturer,
    Title,
}

impl ListingField {
    fn tokens(self, listing: &Listing) -> &[Token] {
        match self {
            ListingField::Manufacturer => &listing.tokens.manufacturer,
            ListingField::Title => &listing.tokens.title,
        }
    }
}

/// Inverted index over one listing field.
pub fn build_field_index(listings: &[Listing], field: ListingField) -> TokenIndex<ListingId> {
    TokenIndex::build(
        listings
            .iter()
            .enumerate()
            .map(|(i, listing)| (ListingId(i), field.tokens(listing))),
    )
}

/// Token indices over listing manufacturers and titles. Read-only once built.
#[derive(Debug, Clone)]
pub struct ListingIndex {
    manufacturer: TokenIndex<ListingId>,
    title: TokenIndex<ListingId>,
    listings: usize,
}

impl ListingIndex {
    pub fn build(listings: &[Listing]) -> Self {
        Self {
            manufacturer: build_field_index(listings, ListingField::Manufacturer),
            title: build_field_index(listings, ListingField::Title),
            listings: listings.len(),
        }
    }

    pub fn field(&self, field: ListingField) -> &TokenIndex<ListingId> {
        match field {
            ListingField::Manufacturer => &self.manufacturer,
            ListingField::Title => &self.title,
        }
    }

    /// Listings worth an exact check for `product`, or `None` when some
    /// product token occurs in no listing at all.
    ///
    /// Each token's bucket replaces the working set when it is smaller.
    /// This is a size heuristic, not an intersection: the policy re-checks
    /// every surviving listing exactly.
    pub fn working_set(&self, product: &Product) -> Option<WorkingSet<'_>> {
        let mut working = WorkingSet::All(self.listings);
        let pairs = [
            (ListingField::Manufacturer, &product.tokens.manufacturer),
            (ListingField::Title, &product.tokens.model),
        ];
        for (field, tokens) in pairs {
            let index = self.field(field);
            for token in tokens {
                let bucket = index.lookup(&token.text)?;
                if bucket.len() < working.len() {
                    working = WorkingSet::Subset(bucket);
                }
            }
        }
        Some(working)
    }
}

/// Listings remaining after index pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingSet<'a> {
    /// Every listing in the arena.
    All(usize),
    Subset(&'a [ListingId]),
}

impl WorkingSet<'_> {
    pub fn len(&self) -> usize {
        match self {
            WorkingSet::All(n) => *n,
            WorkingSet::Subset(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Listings that accept `product` under `policy`, in listing order.
///
/// With an index the candidate set is pruned first; without one every
/// listing is checked.
pub fn match_product(
    product: &Product,
    listings: &[Listing],
    index: Option<&ListingIndex>,
    policy: &dyn MatchPolicy,
) -> Vec<ListingId> {
    let working = match index {
        Some(index) => match index.working_set(product) {
            Some(working) => working,
            None => return Vec::new(),
        },
        None => WorkingSet::All(listings.len()),
    };
    let accepts = |id: &ListingId| policy.may_match(&listings[id.0], product);
    match working {
        WorkingSet::All(n) => (0..n).map(ListingId).filter(accepts).collect(),
        WorkingSet::Subset(ids) => ids.iter().copied().filter(accepts).collect(),
    }
}

/// Products accepted by `listing` under `policy`, in product order.
pub fn match_listing(
    listing: &Listing,
    products: &[Product],
    policy: &dyn MatchPolicy,
) -> Vec<ProductId> {
    products
        .iter()
        .enumerate()
        .filter(|(_, product)| policy.may_match(listing, product))
        .map(|(i, _)| ProductId(i))
        .collect()
}

/// Decide which of two candidates is the closer match, or `None` on a tie.
///
/// The comparator is consulted in both orders and the answer is only
/// trusted when the two agree, so the winner never depends on which
/// candidate happened to come first.
pub fn rank_pair(
    listing: &Listing,
    a: ProductId,
    b: ProductId,
    products: &[Product],
    policy: &dyn MatchPolicy,
) -> Option<ProductId> {
    let (pa, pb) = (&products[a.0], &products[b.0]);
    match (
        policy.compare_detail(listing, pa, pb),
        policy.compare_detail(listing, pb, pa),
    ) {
        (Ordering::Less, Ordering::Greater) => Some(a),
        (Ordering::Greater, Ordering::Less) => Some(b),
        _ => None,
    }
}

/// Best candidate for one listing, or `None` to abstain.
///
/// - no candidates, or more than `max_candidates`: abstain
/// - one candidate: that one
/// - otherwise: the candidate that strictly beats every other one, if any
pub fn pick_best(
    listing: &Listing,
    candidates: &[ProductId],
    products: &[Product],
    policy: &dyn MatchPolicy,
    max_candidates: usize,
) -> Option<ProductId> {
    match candidates {
        [] => None,
        _ if candidates.len() > max_candidates => None,
        [only] => Some(*only),
        [a, b] => rank_pair(listing, *a, *b, products, policy),
        _ => candidates.iter().copied().find(|&c| {
            candidates
                .iter()
                .filter(|&&o| o != c)
                .all(|&o| rank_pair(listing, c, o, products, policy) == Some(c))
        }),
    }
}

/// Fill in `best_candidate` for every slot.
pub fn disambiguate(
    listings: &[Listing],
    products: &[Product],
    slots: &mut [ListingSlot],
    policy: &dyn MatchPolicy,
    max_candidates: usize,
) {
    for (listing, slot) in listings.iter().zip(slots.iter_mut()) {
        slot.best_candidate = pick_best(listing, &slot.candidates, products, policy, max_candidates);
    }
}

/// Product-major candidate generation for a whole catalog.
///
/// Per-product results are merged in product order, so every listing's
/// candidates come out the same whether or not the products were sharded
/// across the rayon pool.
pub fn match_all_products(
    products: &[Product],
    listings: &[Listing],
    index: Option<&ListingIndex>,
    policy: &dyn MatchPolicy,
    parallel: bool,
) -> Vec<ListingSlot> {
    let accepted: Vec<Vec<ListingId>> = if parallel {
        products
            .par_iter()
            .map(|product| match_product(product, listings, index, policy))
            .collect()
    } else {
        products
            .iter()
            .map(|product| match_product(product, listings, index, policy))
            .collect()
    };

    let mut slots = vec![ListingSlot::default(); listings.len()];
    for (product, listing_ids) in accepted.into_iter().enumerate() {
        for listing in listing_ids {
            slots[listing.0].candidates.push(ProductId(product));
        }
    }
    slots
}

/// Listing-major candidate generation: every listing against every product.
pub fn match_all_listings(
    products: &[Product],
    listings: &[Listing],
    policy: &dyn MatchPolicy,
) -> Vec<ListingSlot> {
    listings
        .iter()
        .map(|listing| ListingSlot {
            candidates: match_listing(listing, products, policy),
            best_candidate: None,
        })
        .collect()
}

/// Runs the whole matching process for one batch of products and listings.
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Deduplicate, index, generate candidates and disambiguate.
    pub fn run(&self, products: Vec<Product>, listings: Vec<Listing>) -> MatchOutcome {
        let start = Instant::now();
        let cfg = &self.config;
        let span = tracing::span!(
            Level::INFO,
            "matcher.run",
            policy = %cfg.policy,
            traversal = ?cfg.traversal,
            parallel = cfg.parallel
        );
        let _guard = span.enter();

        let products_in = products.len();
        let products = if cfg.dedupe {
            dedupe(products)
        } else {
            products
        };
        debug!(products_in, products_kept = products.len(), "dedupe_complete");

        let policy = cfg.policy.policy();
        let mut slots = match cfg.traversal {
            Traversal::ProductMajor => {
                let index = cfg.use_index.then(|| ListingIndex::build(&listings));
                if let Some(index) = &index {
                    debug!(
                        manufacturer_tokens = index.manufacturer.len(),
                        title_tokens = index.title.len(),
                        "listing_index_built"
                    );
                }
                match_all_products(&products, &listings, index.as_ref(), policy, cfg.parallel)
            }
            Traversal::ListingMajor => match_all_listings(&products, &listings, policy),
        };
        disambiguate(&listings, &products, &mut slots, policy, cfg.max_candidates);

        let elapsed = start.elapsed();
        let summary = RunSummary {
            policy: cfg.policy,
            products_in,
            products_kept: products.len(),
            listings: listings.len(),
            matched: slots.iter().filter(|s| !s.candidates.is_empty()).count(),
            resolved: slots.iter().filter(|s| s.best_candidate.is_some()).count(),
            candidate_counts: CandidateCounts::from_slots(&slots),
            elapsed_micros: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
        };
        info!(
            products = summary.products_kept,
            duplicates = summary.duplicates_dropped(),
            listings = summary.listings,
            matched = summary.matched,
            resolved = summary.resolved,
            elapsed_micros = summary.elapsed_micros,
            "match_run_success"
        );
        if let Some(recorder) = metrics_recorder() {
            recorder.record_run(elapsed, &summary);
        }

        MatchOutcome {
            products,
            listings,
            slots,
            summary,
        }
    }
}

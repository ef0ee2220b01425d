//! # Listing matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` links marketplace listings to the catalog products they sell.
//! It takes the records produced by `ingest`, tokenizes them with
//! `canonical`, prunes the search with an `index::TokenIndex` over listing
//! fields, and then settles on at most one product per listing.
//!
//! A run has four stages:
//! 1. Deduplicate the catalog with a relaxed identity key ([`dedupe`]).
//! 2. Generate candidates: each product is checked against the listings
//!    its tokens could occur in, under a [`MatchPolicy`].
//! 3. Disambiguate: a listing with one candidate takes it, a listing with
//!    two takes the one the policy ranks strictly higher, anything else
//!    abstains (see [`MatchConfig::max_candidates`]).
//! 4. Summarize the run into a [`RunSummary`].
//!
//! ## Core Types
//!
//! - [`Product`], [`Listing`]: records plus their canonical tokens.
//! - [`ListingSlot`]: the per-listing result, addressed by [`ListingId`].
//! - [`PolicyKind`]: `Loose` favours recall, `Tight` favours precision.
//! - [`Matcher`]: runs the stages above and returns a [`MatchOutcome`].
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{Listing, ListingId, MatchConfig, Matcher, PolicyKind, Product};
//!
//! let products = vec![
//!     Product::new("p1", "Canon", Some("EOS"), "5D"),
//!     Product::new("p2", "Canon", Some("EOS"), "5D Mark II"),
//! ];
//! let listings = vec![Listing::new("l1", "Canon", "Canon EOS 5D Mark II body")];
//!
//! let matcher = Matcher::new(MatchConfig::with_policy(PolicyKind::Tight)).unwrap();
//! let outcome = matcher.run(products, listings);
//!
//! let best = outcome.best_candidate(ListingId(0)).map(|p| p.id.as_str());
//! assert_eq!(best, Some("p2"));
//! ```
//!
//! ## Observability
//!
//! Every run opens a `matcher.run` tracing span and emits a
//! `match_run_success` event. Install a [`MatchMetrics`] implementation via
//! [`set_match_metrics`] to receive the latency and [`RunSummary`] of each
//! run.

pub mod dedup;
pub mod engine;
pub mod metrics;
pub mod outcome;
pub mod policy;
pub mod summary;
pub mod types;

pub use crate::dedup::{dedup_key, dedupe};
pub use crate::engine::{
    build_field_index, disambiguate, match_all_listings, match_all_products, match_listing,
    match_product, pick_best, rank_pair, ListingField, ListingIndex, Matcher, WorkingSet,
};
pub use crate::metrics::{set_match_metrics, MatchMetrics};
pub use crate::outcome::MatchOutcome;
pub use crate::policy::{LoosePolicy, MatchPolicy, TightPolicy};
pub use crate::summary::{CandidateCounts, RunSummary};
pub use crate::types::{
    Listing, ListingId, ListingSlot, ListingTokens, MatchConfig, MatchError, PolicyKind, Product,
    ProductId, ProductTokens, Traversal,
};

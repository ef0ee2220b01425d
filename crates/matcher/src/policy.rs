//! Candidate acceptance policies.
//!
//! A policy answers two questions about a (listing, product) pair:
//!
//! - [`may_match`](MatchPolicy::may_match): is the product a candidate for
//!   the listing at all?
//! - [`compare_detail`](MatchPolicy::compare_detail): of two candidates for
//!   the same listing, which one is the closer match? `Less` means `a`
//!   ranks first, `Greater` means `b` does, `Equal` is a tie.
//!
//! Policies are stateless. [`PolicyKind::policy`] hands out a shared
//! instance for the run.
use std::cmp::Ordering;
use std::collections::HashSet;

use canonical::{contains, find_all, Token};

use crate::types::{Listing, PolicyKind, Product};

/// Acceptance rules for candidate generation and disambiguation.
pub trait MatchPolicy: Send + Sync {
    fn may_match(&self, listing: &Listing, product: &Product) -> bool;

    fn compare_detail(&self, listing: &Listing, a: &Product, b: &Product) -> Ordering;
}

/// Prefers recall. Family is only used to break ties.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoosePolicy;

/// Prefers precision. A product family must appear right next to the model.
#[derive(Debug, Clone, Copy, Default)]
pub struct TightPolicy;

static LOOSE: LoosePolicy = LoosePolicy;
static TIGHT: TightPolicy = TightPolicy;

impl PolicyKind {
    pub fn policy(self) -> &'static dyn MatchPolicy {
        match self {
            PolicyKind::Loose => &LOOSE,
            PolicyKind::Tight => &TIGHT,
        }
    }
}

/// True iff the product has a family and its tokens occur in the title.
fn family_match(listing: &Listing, product: &Product) -> bool {
    match &product.tokens.family {
        Some(family) => contains(&listing.tokens.title, family),
        None => false,
    }
}

/// Ranks a family match ahead of its absence.
fn compare_family(listing: &Listing, a: &Product, b: &Product) -> Ordering {
    // `true` must sort first.
    family_match(listing, b).cmp(&family_match(listing, a))
}

fn model_length(tokens: &[Token]) -> usize {
    tokens.iter().map(Token::len).sum()
}

/// True iff `outer` strictly extends `inner` as a contiguous sublist.
fn strictly_contains(outer: &[Token], inner: &[Token]) -> bool {
    outer.len() > inner.len() && contains(outer, inner)
}

impl MatchPolicy for LoosePolicy {
    fn may_match(&self, listing: &Listing, product: &Product) -> bool {
        contains(&listing.tokens.manufacturer, &product.tokens.manufacturer)
            && contains(&listing.tokens.title, &product.tokens.model)
    }

    fn compare_detail(&self, listing: &Listing, a: &Product, b: &Product) -> Ordering {
        let (am, bm) = (&a.tokens.model, &b.tokens.model);
        compare_family(listing, a, b)
            .then_with(|| bm.len().cmp(&am.len()))
            .then_with(|| model_length(bm).cmp(&model_length(am)))
    }
}

impl MatchPolicy for TightPolicy {
    fn may_match(&self, listing: &Listing, product: &Product) -> bool {
        let title = &listing.tokens.title;
        let model = &product.tokens.model;
        let model_starts = find_all(title, model);
        if model_starts.is_empty() {
            return false;
        }
        if let Some(family) = &product.tokens.family {
            if !family_adjacent(title, family, model, &model_starts) {
                return false;
            }
        }
        contains(&listing.tokens.manufacturer, &product.tokens.manufacturer)
    }

    fn compare_detail(&self, listing: &Listing, a: &Product, b: &Product) -> Ordering {
        let (am, bm) = (&a.tokens.model, &b.tokens.model);
        compare_family(listing, a, b).then_with(|| {
            if strictly_contains(am, bm) {
                Ordering::Less
            } else if strictly_contains(bm, am) {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
    }
}

/// Some family occurrence ends exactly where a model occurrence starts, or
/// starts exactly where one ends.
fn family_adjacent(title: &[Token], family: &[Token], model: &[Token], model_starts: &[usize]) -> bool {
    let model_starts: HashSet<usize> = model_starts.iter().copied().collect();
    find_all(title, family).into_iter().any(|family_start| {
        model_starts.contains(&(family_start + family.len()))
            || family_start
                .checked_sub(model.len())
                .is_some_and(|start| model_starts.contains(&start))
    })
}

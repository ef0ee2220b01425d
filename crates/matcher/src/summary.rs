use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{ListingSlot, PolicyKind};

/// How many listings ended up with each candidate count.
///
/// A listing whose candidates were resolved to a single best match counts
/// as a single-candidate listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateCounts {
    frequencies: BTreeMap<usize, usize>,
    total: usize,
}

impl CandidateCounts {
    pub fn from_slots<'a, I>(slots: I) -> Self
    where
        I: IntoIterator<Item = &'a ListingSlot>,
    {
        let mut counts = Self::default();
        for slot in slots {
            let count = if slot.best_candidate.is_some() {
                1
            } else {
                slot.candidates.len()
            };
            *counts.frequencies.entry(count).or_insert(0) += 1;
            counts.total += 1;
        }
        counts
    }

    /// Number of listings with `count` effective candidates.
    pub fn get(&self, count: usize) -> usize {
        self.frequencies.get(&count).copied().unwrap_or(0)
    }

    /// `(count, frequency)` pairs in ascending count order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.frequencies.iter().map(|(&c, &f)| (c, f))
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

impl fmt::Display for CandidateCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "candidate-count frequencies:")?;
        for (count, frequency) in self.iter() {
            let proportion = 100.0 * frequency as f64 / self.total.max(1) as f64;
            writeln!(f, "{count:3}: {frequency} {proportion:.1}%")?;
        }
        Ok(())
    }
}

/// Outcome statistics of one matching run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    pub policy: PolicyKind,
    pub products_in: usize,
    pub products_kept: usize,
    pub listings: usize,
    /// Listings with at least one candidate.
    pub matched: usize,
    /// Listings with a best candidate.
    pub resolved: usize,
    pub candidate_counts: CandidateCounts,
    pub elapsed_micros: u64,
}

impl RunSummary {
    pub fn duplicates_dropped(&self) -> usize {
        self.products_in - self.products_kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductId;

    fn slot(candidates: &[usize], best: Option<usize>) -> ListingSlot {
        ListingSlot {
            candidates: candidates.iter().copied().map(ProductId).collect(),
            best_candidate: best.map(ProductId),
        }
    }

    #[test]
    fn resolved_listings_count_as_single() {
        let slots = vec![
            slot(&[], None),
            slot(&[0], Some(0)),
            slot(&[0, 1], Some(1)),
            slot(&[0, 1], None),
            slot(&[0, 1, 2], None),
        ];
        let counts = CandidateCounts::from_slots(&slots);
        assert_eq!(counts.get(0), 1);
        assert_eq!(counts.get(1), 2);
        assert_eq!(counts.get(2), 1);
        assert_eq!(counts.get(3), 1);
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn display_lists_percentages() {
        let slots = vec![slot(&[], None), slot(&[0], Some(0))];
        let text = CandidateCounts::from_slots(&slots).to_string();
        assert!(text.starts_with("candidate-count frequencies:\n"));
        assert!(text.contains("  0: 1 50.0%"));
        assert!(text.contains("  1: 1 50.0%"));
    }
}

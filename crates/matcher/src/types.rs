use std::fmt;

use canonical::{tokenize, Token};
use ingest::{ListingRecord, ProductRecord, RawRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Position of a product in the deduplicated catalog of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(pub usize);

/// Position of a listing in the listing arena of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListingId(pub usize);

/// Canonical token fields of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductTokens {
    pub manufacturer: Vec<Token>,
    /// Present iff the source record had a non-null family.
    pub family: Option<Vec<Token>>,
    pub model: Vec<Token>,
}

/// A catalog entry with its canonical tokens. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    /// Source id (or line number when the source had none).
    pub id: String,
    pub manufacturer: String,
    pub family: Option<String>,
    pub model: String,
    pub product_name: Option<String>,
    pub tokens: ProductTokens,
}

impl Product {
    /// Build a product from plain strings, mostly for tests and benches.
    pub fn new(
        id: impl Into<String>,
        manufacturer: impl Into<String>,
        family: Option<&str>,
        model: impl Into<String>,
    ) -> Self {
        Self::from(ProductRecord {
            id: id.into(),
            manufacturer: manufacturer.into(),
            family: family.map(str::to_string),
            model: model.into(),
            product_name: None,
        })
    }

    /// Name used to group resolved listings: `product_name`, else the id.
    pub fn display_name(&self) -> &str {
        self.product_name.as_deref().unwrap_or(&self.id)
    }

    pub fn has_family(&self) -> bool {
        self.tokens.family.is_some()
    }
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        let tokens = ProductTokens {
            manufacturer: tokenize(&record.manufacturer),
            family: record.family.as_deref().map(tokenize),
            model: tokenize(&record.model),
        };
        Self {
            id: record.id,
            manufacturer: record.manufacturer,
            family: record.family,
            model: record.model,
            product_name: record.product_name,
            tokens,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.id,
            self.manufacturer,
            self.family.as_deref().unwrap_or("-"),
            self.model
        )
    }
}

/// Canonical token fields of a listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingTokens {
    pub manufacturer: Vec<Token>,
    pub title: Vec<Token>,
}

/// A marketplace listing with its canonical tokens.
///
/// Match results are not stored here; they live in per-listing
/// [`ListingSlot`]s addressed by [`ListingId`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: String,
    pub manufacturer: String,
    pub title: String,
    /// Original record, echoed back by the result sink.
    pub raw: RawRecord,
    pub tokens: ListingTokens,
}

impl Listing {
    /// Build a listing from plain strings, mostly for tests and benches.
    pub fn new(
        id: impl Into<String>,
        manufacturer: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        let manufacturer = manufacturer.into();
        let title = title.into();
        let mut raw = RawRecord::new();
        raw.insert("title".into(), title.clone().into());
        raw.insert("manufacturer".into(), manufacturer.clone().into());
        Self::from(ListingRecord {
            id: id.into(),
            manufacturer,
            title,
            raw,
        })
    }
}

impl From<ListingRecord> for Listing {
    fn from(record: ListingRecord) -> Self {
        let tokens = ListingTokens {
            manufacturer: tokenize(&record.manufacturer),
            title: tokenize(&record.title),
        };
        Self {
            id: record.id,
            manufacturer: record.manufacturer,
            title: record.title,
            raw: record.raw,
            tokens,
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.id, self.manufacturer, self.title)
    }
}

/// Per-listing match result. Written once per run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingSlot {
    /// Accepted products in product iteration order, no duplicates.
    pub candidates: Vec<ProductId>,
    /// Always an element of `candidates` when set.
    pub best_candidate: Option<ProductId>,
}

/// Which acceptance policy a run uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Prefer recall: manufacturer and model containment only.
    Loose,
    /// Prefer precision: family must sit next to the model when present.
    #[default]
    Tight,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Loose => f.write_str("loose"),
            PolicyKind::Tight => f.write_str("tight"),
        }
    }
}

/// Order in which products and listings are paired up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Traversal {
    /// Each product queries the listing index. The fast path.
    #[default]
    ProductMajor,
    /// Each listing is checked against every product. Same result, no
    /// index; useful for verifying the pruned path.
    ListingMajor,
}

/// Configuration for a matching run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchConfig {
    #[serde(default)]
    pub policy: PolicyKind,
    /// Listings with more candidates than this are left unresolved.
    #[serde(default = "MatchConfig::default_max_candidates")]
    pub max_candidates: usize,
    /// Drop near-duplicate products before matching.
    #[serde(default = "MatchConfig::default_true")]
    pub dedupe: bool,
    /// Prune product-major matching with the listing token index.
    #[serde(default = "MatchConfig::default_true")]
    pub use_index: bool,
    #[serde(default)]
    pub traversal: Traversal,
    /// Shard product-major matching across the rayon pool.
    #[serde(default)]
    pub parallel: bool,
}

impl MatchConfig {
    pub(crate) fn default_max_candidates() -> usize {
        2
    }

    pub(crate) fn default_true() -> bool {
        true
    }

    /// Default configuration with the given policy.
    pub fn with_policy(policy: PolicyKind) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.max_candidates == 0 {
            return Err(MatchError::InvalidConfig(
                "max_candidates must be at least 1".into(),
            ));
        }
        if self.parallel && self.traversal == Traversal::ListingMajor {
            return Err(MatchError::InvalidConfig(
                "parallel matching requires product_major traversal".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            max_candidates: Self::default_max_candidates(),
            dedupe: true,
            use_index: true,
            traversal: Traversal::default(),
            parallel: false,
        }
    }
}

/// Errors produced by the matching layer.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
}

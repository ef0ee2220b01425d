//! # Listmatch Index
//!
//! An in-memory inverted index from token text to the set of documents whose
//! token sequence contains that text. The matcher builds one per listing
//! field (manufacturer, title) and queries it with product tokens to shrink
//! the set of listings worth an exact check.
//!
//! Buckets behave as sets: a document appears once per distinct token text
//! no matter how often the token recurs. Buckets are kept sorted by key so
//! iteration order is deterministic.
//!
//! ## Example Usage
//!
//! ```
//! use canonical::tokenize;
//! use index::TokenIndex;
//!
//! let titles = ["Canon EOS 5D", "Nikon D90 kit", "Canon PowerShot D10"];
//! let tokens: Vec<_> = titles.iter().map(|t| tokenize(t)).collect();
//! let index = TokenIndex::build(tokens.iter().enumerate().map(|(i, t)| (i, t.as_slice())));
//!
//! assert_eq!(index.lookup("canon"), Some(&[0, 2][..]));
//! assert_eq!(index.lookup("d"), Some(&[0, 1, 2][..]));
//! assert_eq!(index.lookup("sony"), None);
//! ```

use canonical::Token;
use hashbrown::HashMap;

/// Inverted index keyed by token text.
#[derive(Debug, Clone)]
pub struct TokenIndex<K> {
    buckets: HashMap<String, Vec<K>>,
    documents: usize,
}

impl<K: Copy + Ord> TokenIndex<K> {
    /// Index every `(key, tokens)` pair.
    pub fn build<'a, I>(docs: I) -> Self
    where
        I: IntoIterator<Item = (K, &'a [Token])>,
    {
        let mut buckets: HashMap<String, Vec<K>> = HashMap::new();
        let mut documents = 0;
        for (key, tokens) in docs {
            documents += 1;
            for token in tokens {
                let bucket = buckets.entry_ref(token.text.as_str()).or_default();
                // Consecutive repeats of a token within one document are the
                // common case; the final sort/dedup handles the rest.
                if bucket.last() != Some(&key) {
                    bucket.push(key);
                }
            }
        }
        for bucket in buckets.values_mut() {
            bucket.sort_unstable();
            bucket.dedup();
        }
        Self { buckets, documents }
    }

    /// Documents containing `text`, or `None` when no document does.
    pub fn lookup(&self, text: &str) -> Option<&[K]> {
        self.buckets.get(text).map(Vec::as_slice)
    }

    /// Number of documents that were indexed, including ones with no tokens.
    pub fn document_count(&self) -> usize {
        self.documents
    }

    /// Number of distinct token texts.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

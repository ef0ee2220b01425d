//! Error types produced by the ingest crate.
//!
//! Every variant is fatal for a run: a malformed record would make indexing
//! and matching silently incomplete, so callers abort before matching starts.
//!
//! | Error | Cause |
//! |-------|-------|
//! | [`Io`](IngestError::Io) | Input file missing or unreadable |
//! | [`InvalidJson`](IngestError::InvalidJson) | Line is not valid JSON |
//! | [`NotAnObject`](IngestError::NotAnObject) | Line is JSON but not an object |
//! | [`MissingField`](IngestError::MissingField) | Required field absent or `null` |
//! | [`InvalidField`](IngestError::InvalidField) | Field present with the wrong JSON type |
use thiserror::Error;

use crate::types::RecordKind;

/// Errors that can occur while reading product or listing records.
///
/// `line` is always the 1-based line number in the source.
///
/// ```rust
/// use ingest::{IngestError, RecordKind};
///
/// let err = IngestError::MissingField {
///     kind: RecordKind::Listing,
///     line: 7,
///     field: "title",
/// };
/// assert_eq!(err.to_string(), "listing on line 7 is missing required field `title`");
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{kind} on line {line} is not valid JSON: {message}")]
    InvalidJson {
        kind: RecordKind,
        line: usize,
        message: String,
    },

    #[error("{kind} on line {line} is not a JSON object")]
    NotAnObject { kind: RecordKind, line: usize },

    #[error("{kind} on line {line} is missing required field `{field}`")]
    MissingField {
        kind: RecordKind,
        line: usize,
        field: &'static str,
    },

    #[error("{kind} on line {line} has field `{field}` that is not {expected}")]
    InvalidField {
        kind: RecordKind,
        line: usize,
        field: &'static str,
        expected: &'static str,
    },
}

impl IngestError {
    /// Line number of the offending record, if the error is record-specific.
    pub fn line(&self) -> Option<usize> {
        match self {
            IngestError::Io { .. } => None,
            IngestError::InvalidJson { line, .. }
            | IngestError::NotAnObject { line, .. }
            | IngestError::MissingField { line, .. }
            | IngestError::InvalidField { line, .. } => Some(*line),
        }
    }
}

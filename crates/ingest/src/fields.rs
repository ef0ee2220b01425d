//! Field extraction and validation for raw JSON records.
use serde_json::Value;

use crate::error::IngestError;
use crate::types::{RawRecord, RecordKind};

/// Record id: the `id` field rendered as a string, or the line number.
pub(crate) fn record_id(
    kind: RecordKind,
    line: usize,
    record: &RawRecord,
) -> Result<String, IngestError> {
    match record.get("id") {
        None | Some(Value::Null) => Ok(line.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(IngestError::InvalidField {
            kind,
            line,
            field: "id",
            expected: "a string or number",
        }),
    }
}

pub(crate) fn required_string(
    kind: RecordKind,
    line: usize,
    record: &RawRecord,
    field: &'static str,
) -> Result<String, IngestError> {
    optional_string(kind, line, record, field)?.ok_or(IngestError::MissingField {
        kind,
        line,
        field,
    })
}

/// Absent and `null` both mean "no value".
pub(crate) fn optional_string(
    kind: RecordKind,
    line: usize,
    record: &RawRecord,
    field: &'static str,
) -> Result<Option<String>, IngestError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(IngestError::InvalidField {
            kind,
            line,
            field,
            expected: "a string",
        }),
    }
}

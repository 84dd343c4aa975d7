//! Raw value normalization.
//!
//! Audit-log values arrive either already structured or as text that may
//! encode a document. Normalization turns both into a canonical [`Value`]
//! tree and never fails: anything that does not parse stays literal text.

use chlog_types::{RawValue, Value};
use tracing::trace;

/// Convert a recorded value into the canonical tree.
///
/// The caller's data is deep-copied, never modified.
pub fn normalize(raw: &RawValue) -> Value {
    match raw {
        RawValue::String(s) => match parse_embedded(s) {
            Some(parsed) => normalize(&parsed),
            None => Value::Str(s.clone()),
        },
        other => Value::from(other),
    }
}

/// Try to read `text` as an embedded object or array.
///
/// Only text that looks like a document (`{...}` or `[...]`) is probed, so
/// scalar-looking strings such as `"5"` or `"true"` stay strings.
fn parse_embedded(text: &str) -> Option<RawValue> {
    let trimmed = text.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    match serde_json::from_str::<RawValue>(trimmed) {
        Ok(parsed @ (RawValue::Object(_) | RawValue::Array(_))) => Some(parsed),
        Ok(_) => None,
        Err(e) => {
            trace!(error = %e, "value is not an embedded document, keeping it as text");
            None
        }
    }
}

//! Lenient field decoders for spreadsheet-backed payloads.
//!
//! Sheet cells that look numeric come back as JSON numbers, so codes like
//! `001` or `1234` may arrive either as strings or as numbers.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts a string, number, bool or null and yields its textual form.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Same as [`string_or_number`] but keeps `None` for absent or null fields.
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// A list that the backend may send as `null` when it has no rows.
pub(crate) fn seq_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

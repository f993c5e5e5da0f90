use serde_json::Value;

/// Text form of a payload value as stored in a channel column.
///
/// Null maps to SQL NULL; nested arrays/objects are kept as compact JSON.
pub fn to_column_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

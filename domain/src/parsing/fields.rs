//! Lenient field extraction from untyped JSON.
//!
//! Model output has no guaranteed schema, so typed results are populated
//! field by field: missing arrays become empty, scalars are coerced where
//! the intent is unambiguous.

use serde_json::Value;

/// Convert a JSON value to a string (numbers are stringified; null and empty strings are `None`)
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// String field, or empty when missing.
pub fn string_field(json: &Value, key: &str) -> String {
    json.get(key).and_then(value_to_string).unwrap_or_default()
}

/// Array-of-strings field, or empty when missing. Non-string entries are skipped.
pub fn string_list(json: &Value, key: &str) -> Vec<String> {
    json.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(value_to_string).collect())
        .unwrap_or_default()
}

/// Boolean field; accepts `true`/`false` and the strings `"true"`/`"false"`.
pub fn bool_field(json: &Value, key: &str) -> Option<bool> {
    match json.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Percentage-like field clamped to `0..=100`.
pub fn percent_field(json: &Value, key: &str) -> Option<u8> {
    let raw = match json.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').parse().ok()?,
        _ => return None,
    };
    if raw.is_nan() {
        return None;
    }
    Some(raw.round().clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!("a")), Some("a".to_string()));
        assert_eq!(value_to_string(&json!(3)), Some("3".to_string()));
        assert_eq!(value_to_string(&json!("  ")), None);
        assert_eq!(value_to_string(&json!(null)), None);
    }

    #[test]
    fn test_string_list_defaults_to_empty() {
        let json = json!({"files": ["a.rs", 1, null, ""]});
        assert_eq!(string_list(&json, "files"), vec!["a.rs", "1"]);
        assert!(string_list(&json, "missing").is_empty());
    }

    #[test]
    fn test_bool_field() {
        let json = json!({"a": true, "b": "false", "c": 1});
        assert_eq!(bool_field(&json, "a"), Some(true));
        assert_eq!(bool_field(&json, "b"), Some(false));
        assert_eq!(bool_field(&json, "c"), None);
    }

    #[test]
    fn test_percent_field_clamps() {
        let json = json!({"hi": 140, "lo": -5, "mid": "72.6%", "bad": "n/a"});
        assert_eq!(percent_field(&json, "hi"), Some(100));
        assert_eq!(percent_field(&json, "lo"), Some(0));
        assert_eq!(percent_field(&json, "mid"), Some(73));
        assert_eq!(percent_field(&json, "bad"), None);
    }
}

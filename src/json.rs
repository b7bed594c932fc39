//! Classification layer over parsed JSON values.
//!
//! The engine never defines its own JSON tree; `serde_json::Value` is the
//! parse product and attachments are values from it. This module provides
//! the six user-facing kind names and the length convention used by the
//! extraction verbs.

use serde_json::Value;

/// The six JSON kinds as reported by `json_types`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    Object,
    Array,
    String,
    Number,
    Logical,
    Null,
}

impl JsonType {
    /// Classify a JSON value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => JsonType::Object,
            Value::Array(_) => JsonType::Array,
            Value::String(_) => JsonType::String,
            Value::Number(_) => JsonType::Number,
            Value::Bool(_) => JsonType::Logical,
            Value::Null => JsonType::Null,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::String => "string",
            JsonType::Number => "number",
            JsonType::Logical => "logical",
            JsonType::Null => "null",
        }
    }
}

/// Length of a JSON value: entry/element count for objects and arrays,
/// 1 for every scalar and for null (a scalar is "a single value").
pub fn json_length(value: &Value) -> usize {
    match value {
        Value::Object(obj) => obj.len(),
        Value::Array(arr) => arr.len(),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classification() {
        assert_eq!(JsonType::of(&json!({})).as_str(), "object");
        assert_eq!(JsonType::of(&json!([])).as_str(), "array");
        assert_eq!(JsonType::of(&json!("a")).as_str(), "string");
        assert_eq!(JsonType::of(&json!(1)).as_str(), "number");
        assert_eq!(JsonType::of(&json!(true)).as_str(), "logical");
        assert_eq!(JsonType::of(&json!(null)).as_str(), "null");
    }

    #[test]
    fn test_length_convention() {
        assert_eq!(json_length(&json!([1, 2, 3])), 3);
        assert_eq!(json_length(&json!({"k1": 1, "k2": 2})), 2);
        assert_eq!(json_length(&json!(1)), 1);
        assert_eq!(json_length(&json!("abc")), 1);
        assert_eq!(json_length(&json!(null)), 1);
        assert_eq!(json_length(&json!([])), 0);
        assert_eq!(json_length(&json!({})), 0);
    }
}

use serde_json::Value;

use crate::error::{Error, Result};

/// Child `key` of `parent`, failing with `MissingField(path)` when absent
pub fn require<'a>(parent: &'a Value, key: &str, path: &str) -> Result<&'a Value> {
    parent.get(key).ok_or_else(|| Error::missing(path))
}

/// Child array `key` of `parent`; absent is `MissingField`, non-array is `InvalidField`
pub fn require_array<'a>(parent: &'a Value, key: &str, path: &str) -> Result<&'a [Value]> {
    as_array(require(parent, key, path)?, path)
}

/// Child array `key` of `parent` when present
pub fn optional_array<'a>(parent: &'a Value, key: &str, path: &str) -> Result<Option<&'a [Value]>> {
    parent.get(key).map(|item| as_array(item, path)).transpose()
}

fn as_array<'a>(item: &'a Value, path: &str) -> Result<&'a [Value]> {
    item.as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| Error::invalid(path, format!("expected an array, found {}", kind(item))))
}

fn kind(item: &Value) -> &'static str {
    match item {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_require_array_given_array_should_return_ok() {
        let doc = json!({ "offsets": [0, 1] });
        let offsets = require_array(&doc, "offsets", "csr_constraint_matrix.offsets").unwrap();
        assert_eq!(offsets.len(), 2);
    }

    #[test]
    fn test_require_array_given_missing_key_should_return_missing_field() {
        let doc = json!({});
        let result = require_array(&doc, "offsets", "csr_constraint_matrix.offsets");
        assert!(matches!(result, Err(Error::MissingField(ref f)) if f == "csr_constraint_matrix.offsets"));
    }

    #[test]
    fn test_require_array_given_scalar_should_return_invalid_field() {
        let doc = json!({ "offsets": "0,1" });
        let result = require_array(&doc, "offsets", "csr_constraint_matrix.offsets");
        match result {
            Err(Error::InvalidField { field, reason }) => {
                assert_eq!(field, "csr_constraint_matrix.offsets");
                assert_eq!(reason, "expected an array, found a string");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_optional_array_given_missing_key_should_return_none() {
        let doc = json!({ "other": [] });
        assert!(optional_array(&doc, "types", "constraint_bounds.types")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_require_given_non_object_parent_should_return_missing_field() {
        let doc = json!([1, 2, 3]);
        assert!(require(&doc, "objective_data", "objective_data").is_err());
    }
}

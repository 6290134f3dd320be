//! Input normalization for client-supplied structures
//!
//! Clients encode mutation inputs and filter specs in whatever shape their
//! transport produced: nested objects, mapping-like values, or nothing at
//! all. Everything crosses exactly one boundary, [`NormalizedInput::coerce`],
//! after which downstream code does simple key lookups and never branches
//! on the raw shape again.
//!
//! Coercion strips fields whose value is `null`, the empty string, or an
//! empty array; no validation happens here.

use indexmap::IndexMap;
use serde_json::Value;

/// A uniform field-name → value mapping with empty/absent fields stripped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedInput {
    fields: IndexMap<String, Value>,
}

impl NormalizedInput {
    /// Normalize an arbitrary structured input value.
    ///
    /// Absent input, non-object input, and objects holding only empty
    /// values all yield the empty mapping.
    pub fn coerce(input: Option<&Value>) -> Self {
        let mut fields = IndexMap::new();
        if let Some(Value::Object(map)) = input {
            for (key, value) in map {
                if is_meaningful(value) {
                    fields.insert(key.clone(), value.clone());
                }
            }
        }
        Self { fields }
    }

    /// Look up a field by name
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a field expected to be a string
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterate fields in the order the client supplied them
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_strips_null_empty_string_and_empty_list() {
        let input = json!({
            "name": "Alice",
            "email": null,
            "phone": "",
            "tags": [],
        });
        let normalized = NormalizedInput::coerce(Some(&input));
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized.str_field("name"), Some("Alice"));
        assert!(!normalized.contains("email"));
        assert!(!normalized.contains("phone"));
        assert!(!normalized.contains("tags"));
    }

    #[test]
    fn test_coerce_keeps_zero_and_false() {
        let input = json!({ "stock": 0, "active": false });
        let normalized = NormalizedInput::coerce(Some(&input));
        assert_eq!(normalized.get("stock"), Some(&json!(0)));
        assert_eq!(normalized.get("active"), Some(&json!(false)));
    }

    #[test]
    fn test_coerce_keeps_whitespace_only_strings() {
        // Whitespace is for validators to reject; only the truly empty
        // string is treated as absent.
        let input = json!({ "name": "   " });
        let normalized = NormalizedInput::coerce(Some(&input));
        assert_eq!(normalized.str_field("name"), Some("   "));
    }

    #[test]
    fn test_absent_input_yields_empty_mapping() {
        let normalized = NormalizedInput::coerce(None);
        assert!(normalized.is_empty());
    }

    #[test]
    fn test_non_object_input_yields_empty_mapping() {
        assert!(NormalizedInput::coerce(Some(&json!("scalar"))).is_empty());
        assert!(NormalizedInput::coerce(Some(&json!([1, 2]))).is_empty());
        assert!(NormalizedInput::coerce(Some(&json!(null))).is_empty());
    }

    #[test]
    fn test_iteration_preserves_client_field_order() {
        let input = json!({ "b": 1, "a": 2, "c": 3 });
        let normalized = NormalizedInput::coerce(Some(&input));
        let keys: Vec<&str> = normalized.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_nested_objects_pass_through_unflattened() {
        let input = json!({ "meta": { "a": 1 } });
        let normalized = NormalizedInput::coerce(Some(&input));
        assert_eq!(normalized.get("meta"), Some(&json!({ "a": 1 })));
    }
}

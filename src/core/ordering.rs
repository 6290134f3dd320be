//! Allow-listed multi-key ordering
//!
//! Order specifications arrive either as a comma-joined string
//! (`"name,-created_at"`) or as a JSON array of field names, each optionally
//! prefixed with `-` for descending. Each requested field is checked
//! (ignoring the prefix) against a fixed per-entity allow-list; fields
//! outside the list are silently dropped rather than errored: a client typo
//! degrades the sort instead of failing the whole query. An empty surviving
//! list leaves the collection unordered.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::cmp::Ordering;

/// Fields a client may sort customers by
pub const CUSTOMER_ORDER_FIELDS: &[&str] = &["name", "email", "created_at"];
/// Fields a client may sort products by
pub const PRODUCT_ORDER_FIELDS: &[&str] = &["name", "price", "stock", "created_at"];
/// Fields a client may sort orders by
pub const ORDER_ORDER_FIELDS: &[&str] = &["order_date", "total_amount", "created_at"];

/// One surviving sort instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    pub field: String,
    pub descending: bool,
}

/// A comparable projection of one entity field
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Int(i64),
    Number(Decimal),
    Timestamp(DateTime<Utc>),
}

impl SortValue {
    /// Compare two values of the same kind; mixed kinds compare equal so a
    /// misbehaving `Sortable` impl degrades to a no-op instead of panicking.
    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Int(a), SortValue::Int(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.cmp(b),
            (SortValue::Timestamp(a), SortValue::Timestamp(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Entities that expose sortable field projections
pub trait Sortable {
    /// The comparable value for `field`, or `None` if the entity does not
    /// expose that field for sorting.
    fn sort_value(&self, field: &str) -> Option<SortValue>;
}

/// Parse an order specification against an allow-list.
///
/// Disallowed fields are dropped without error. Unrecognized spec shapes
/// (numbers, objects) yield no keys at all.
pub fn parse_order_spec(spec: Option<&Value>, allowed: &[&str]) -> Vec<OrderKey> {
    let requested: Vec<String> = match spec {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::String(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect(),
        Some(_) => return Vec::new(),
    };

    requested
        .into_iter()
        .filter_map(|raw| {
            let descending = raw.starts_with('-');
            let field = raw.trim_start_matches('-').to_string();
            if allowed.contains(&field.as_str()) {
                Some(OrderKey { field, descending })
            } else {
                None
            }
        })
        .collect()
}

/// Stable multi-key sort in place. With no keys the collection is left
/// exactly as the store returned it.
pub fn apply_ordering<T: Sortable>(items: &mut [T], keys: &[OrderKey]) {
    if keys.is_empty() {
        return;
    }
    items.sort_by(|a, b| {
        for key in keys {
            let ordering = match (a.sort_value(&key.field), b.sort_value(&key.field)) {
                (Some(left), Some(right)) => left.compare(&right),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            };
            let ordering = if key.descending {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Row {
        name: &'static str,
        rank: i64,
    }

    impl Sortable for Row {
        fn sort_value(&self, field: &str) -> Option<SortValue> {
            match field {
                "name" => Some(SortValue::Text(self.name.to_string())),
                "rank" => Some(SortValue::Int(self.rank)),
                _ => None,
            }
        }
    }

    const ALLOWED: &[&str] = &["name", "rank"];

    #[test]
    fn test_parse_comma_joined_string() {
        let keys = parse_order_spec(Some(&json!("name, -rank")), ALLOWED);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].field, "name");
        assert!(!keys[0].descending);
        assert_eq!(keys[1].field, "rank");
        assert!(keys[1].descending);
    }

    #[test]
    fn test_parse_list_form() {
        let keys = parse_order_spec(Some(&json!(["-name", "rank"])), ALLOWED);
        assert_eq!(keys.len(), 2);
        assert!(keys[0].descending);
    }

    #[test]
    fn test_disallowed_fields_silently_dropped() {
        let keys = parse_order_spec(Some(&json!("secret,-name,typo")), ALLOWED);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].field, "name");
        assert!(keys[0].descending);
    }

    #[test]
    fn test_all_fields_dropped_yields_empty_spec() {
        let keys = parse_order_spec(Some(&json!("nope,-missing")), ALLOWED);
        assert!(keys.is_empty());
    }

    #[test]
    fn test_absent_spec_yields_no_keys() {
        assert!(parse_order_spec(None, ALLOWED).is_empty());
        assert!(parse_order_spec(Some(&json!(null)), ALLOWED).is_empty());
        assert!(parse_order_spec(Some(&json!("")), ALLOWED).is_empty());
    }

    #[test]
    fn test_sort_ascending_and_descending() {
        let mut rows = vec![
            Row { name: "b", rank: 1 },
            Row { name: "a", rank: 3 },
            Row { name: "c", rank: 2 },
        ];
        apply_ordering(&mut rows, &parse_order_spec(Some(&json!("name")), ALLOWED));
        assert_eq!(rows[0].name, "a");

        apply_ordering(&mut rows, &parse_order_spec(Some(&json!("-rank")), ALLOWED));
        assert_eq!(rows[0].rank, 3);
        assert_eq!(rows[2].rank, 1);
    }

    #[test]
    fn test_multi_key_sort_uses_later_keys_to_break_ties() {
        let mut rows = vec![
            Row { name: "x", rank: 2 },
            Row { name: "x", rank: 1 },
            Row { name: "a", rank: 9 },
        ];
        let keys = parse_order_spec(Some(&json!("name,rank")), ALLOWED);
        apply_ordering(&mut rows, &keys);
        assert_eq!(rows[0].name, "a");
        assert_eq!(rows[1].rank, 1);
        assert_eq!(rows[2].rank, 2);
    }

    #[test]
    fn test_no_keys_leaves_order_untouched() {
        let mut rows = vec![Row { name: "b", rank: 1 }, Row { name: "a", rank: 2 }];
        apply_ordering(&mut rows, &[]);
        assert_eq!(rows[0].name, "b");
    }
}

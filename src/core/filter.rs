//! Declarative per-entity filtering
//!
//! Each entity type declares a small fixed set of filterable fields. A
//! client filter spec is coerced through [`NormalizedInput`], shape-checked
//! field by field (collecting every problem before failing), and turned into
//! a typed predicate. An empty spec is the identity; no implicit predicate
//! is ever applied. Applied predicates are the conjunction of all supplied
//! conditions.
//!
//! Unknown fields are rejected, unlike the Ordering Engine's allow-list
//! which silently drops strays: a bad filter changes the result set, so it
//! must be loud.

use crate::core::entity::{Customer, OrderDetail, Product};
use crate::core::error::{CrmResult, FilterValidationError};
use crate::core::id::decode_global_id;
use crate::core::input::NormalizedInput;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

/// Filterable fields for customers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerFilter {
    pub name_icontains: Option<String>,
    pub email_icontains: Option<String>,
    pub created_at_gte: Option<DateTime<Utc>>,
    pub created_at_lte: Option<DateTime<Utc>>,
    pub phone_pattern: Option<String>,
}

impl CustomerFilter {
    /// Build a customer filter from a raw client value, aggregating every
    /// field-level error into one [`FilterValidationError`].
    pub fn from_input(input: Option<&Value>) -> CrmResult<Self> {
        let data = NormalizedInput::coerce(input);
        let mut filter = Self::default();
        let mut errors = Vec::new();

        for (field, value) in data.iter() {
            match field {
                "name_icontains" => filter.name_icontains = expect_string(field, value, &mut errors),
                "email_icontains" => {
                    filter.email_icontains = expect_string(field, value, &mut errors);
                }
                "created_at_gte" => filter.created_at_gte = expect_datetime(field, value, &mut errors),
                "created_at_lte" => filter.created_at_lte = expect_datetime(field, value, &mut errors),
                "phone_pattern" => filter.phone_pattern = expect_string(field, value, &mut errors),
                _ => errors.push(format!("Unknown filter field '{}'", field)),
            }
        }

        if errors.is_empty() {
            Ok(filter)
        } else {
            Err(FilterValidationError::new(errors).into())
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        icontains(&customer.name, self.name_icontains.as_deref())
            && icontains(&customer.email, self.email_icontains.as_deref())
            && lower_bound(customer.created_at, self.created_at_gte)
            && upper_bound(customer.created_at, self.created_at_lte)
            && self
                .phone_pattern
                .as_deref()
                .is_none_or(|pattern| customer.phone.starts_with(pattern))
    }
}

/// Filterable fields for products
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub name_icontains: Option<String>,
    pub price_gte: Option<Decimal>,
    pub price_lte: Option<Decimal>,
    pub stock_gte: Option<i64>,
    pub stock_lte: Option<i64>,
}

impl ProductFilter {
    pub fn from_input(input: Option<&Value>) -> CrmResult<Self> {
        let data = NormalizedInput::coerce(input);
        let mut filter = Self::default();
        let mut errors = Vec::new();

        for (field, value) in data.iter() {
            match field {
                "name_icontains" => filter.name_icontains = expect_string(field, value, &mut errors),
                "price_gte" => filter.price_gte = expect_decimal(field, value, &mut errors),
                "price_lte" => filter.price_lte = expect_decimal(field, value, &mut errors),
                "stock_gte" => filter.stock_gte = expect_int(field, value, &mut errors),
                "stock_lte" => filter.stock_lte = expect_int(field, value, &mut errors),
                _ => errors.push(format!("Unknown filter field '{}'", field)),
            }
        }

        if errors.is_empty() {
            Ok(filter)
        } else {
            Err(FilterValidationError::new(errors).into())
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, product: &Product) -> bool {
        icontains(&product.name, self.name_icontains.as_deref())
            && lower_bound(product.price, self.price_gte)
            && upper_bound(product.price, self.price_lte)
            && lower_bound(product.stock, self.stock_gte)
            && upper_bound(product.stock, self.stock_lte)
    }
}

/// Filterable fields for orders, including relation-reaching conditions.
///
/// `product_id` accepts either identifier form; it is resolved to the
/// database id at parse time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub total_amount_gte: Option<Decimal>,
    pub total_amount_lte: Option<Decimal>,
    pub order_date_gte: Option<DateTime<Utc>>,
    pub order_date_lte: Option<DateTime<Utc>>,
    pub customer_name: Option<String>,
    pub product_name: Option<String>,
    pub product_id: Option<i64>,
}

impl OrderFilter {
    pub fn from_input(input: Option<&Value>) -> CrmResult<Self> {
        let data = NormalizedInput::coerce(input);
        let mut filter = Self::default();
        let mut errors = Vec::new();

        for (field, value) in data.iter() {
            match field {
                "total_amount_gte" => {
                    filter.total_amount_gte = expect_decimal(field, value, &mut errors);
                }
                "total_amount_lte" => {
                    filter.total_amount_lte = expect_decimal(field, value, &mut errors);
                }
                "order_date_gte" => filter.order_date_gte = expect_datetime(field, value, &mut errors),
                "order_date_lte" => filter.order_date_lte = expect_datetime(field, value, &mut errors),
                "customer_name" => filter.customer_name = expect_string(field, value, &mut errors),
                "product_name" => filter.product_name = expect_string(field, value, &mut errors),
                "product_id" => filter.product_id = expect_id(field, value, &mut errors),
                _ => errors.push(format!("Unknown filter field '{}'", field)),
            }
        }

        if errors.is_empty() {
            Ok(filter)
        } else {
            Err(FilterValidationError::new(errors).into())
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, detail: &OrderDetail) -> bool {
        lower_bound(detail.order.total_amount, self.total_amount_gte)
            && upper_bound(detail.order.total_amount, self.total_amount_lte)
            && lower_bound(detail.order.order_date, self.order_date_gte)
            && upper_bound(detail.order.order_date, self.order_date_lte)
            && icontains(&detail.customer.name, self.customer_name.as_deref())
            && self.product_name.as_deref().is_none_or(|needle| {
                detail
                    .products
                    .iter()
                    .any(|product| contains_ci(&product.name, needle))
            })
            && self
                .product_id
                .is_none_or(|id| detail.products.iter().any(|product| product.id == id))
    }
}

// === Shape-check helpers (collect, never bail early) ===

fn expect_string(field: &str, value: &Value, errors: &mut Vec<String>) -> Option<String> {
    match value.as_str() {
        Some(s) => Some(s.to_string()),
        None => {
            errors.push(format!("{} must be a string", field));
            None
        }
    }
}

fn expect_datetime(field: &str, value: &Value, errors: &mut Vec<String>) -> Option<DateTime<Utc>> {
    let parsed = value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));
    if parsed.is_none() {
        errors.push(format!("{} must be an ISO-8601 datetime", field));
    }
    parsed
}

fn expect_decimal(field: &str, value: &Value, errors: &mut Vec<String>) -> Option<Decimal> {
    let parsed = match value {
        Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    };
    if parsed.is_none() {
        errors.push(format!("{} must be a number", field));
    }
    parsed
}

fn expect_int(field: &str, value: &Value, errors: &mut Vec<String>) -> Option<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    if parsed.is_none() {
        errors.push(format!("{} must be an integer", field));
    }
    parsed
}

fn expect_id(field: &str, value: &Value, errors: &mut Vec<String>) -> Option<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s
            .parse::<i64>()
            .ok()
            .or_else(|| decode_global_id(s).map(|(_, id)| id)),
        _ => None,
    };
    if parsed.is_none() {
        errors.push(format!("{} must be a valid ID", field));
    }
    parsed
}

// === Predicate helpers ===

fn icontains(haystack: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|n| contains_ci(haystack, n))
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn lower_bound<T: PartialOrd>(value: T, bound: Option<T>) -> bool {
    bound.is_none_or(|b| value >= b)
}

fn upper_bound<T: PartialOrd>(value: T, bound: Option<T>) -> bool {
    bound.is_none_or(|b| value <= b)
}

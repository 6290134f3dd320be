//! Persisted entity types for the CRM core
//!
//! Three aggregates: `Customer`, `Product`, `Order`. The storage collaborator
//! owns persistence; these types only carry state between the store and the
//! query/mutation layers.
//!
//! All entities carry integer surrogate keys plus a relay-style global
//! identifier (`global_id()`), since the API accepts either form on input.

use crate::core::id;
use crate::core::ordering::{SortValue, Sortable};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A customer record.
///
/// `email` is case-insensitively unique across all customers. `phone` is
/// stored as an empty string when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Node type name used in relay-style global identifiers
    pub const NODE_TYPE: &'static str = "CustomerNode";

    /// Opaque encoded global identifier for this customer
    pub fn global_id(&self) -> String {
        id::encode_global_id(Self::NODE_TYPE, self.id)
    }
}

/// A product record. `price` is strictly positive, `stock` never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Node type name used in relay-style global identifiers
    pub const NODE_TYPE: &'static str = "ProductNode";

    /// Opaque encoded global identifier for this product
    pub fn global_id(&self) -> String {
        id::encode_global_id(Self::NODE_TYPE, self.id)
    }
}

/// An order row. The product association lives in the store; `total_amount`
/// is a snapshot of the linked product prices, never client-supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub order_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Node type name used in relay-style global identifiers
    pub const NODE_TYPE: &'static str = "OrderNode";

    /// Opaque encoded global identifier for this order
    pub fn global_id(&self) -> String {
        id::encode_global_id(Self::NODE_TYPE, self.id)
    }
}

/// An order together with its eager-loaded customer and product set.
///
/// Query resolvers work on this shape so that relation-based filters
/// (customer name, product name, product id) need no per-row round-trips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Customer,
    pub products: Vec<Product>,
}

// === Sort key extraction for the Ordering Engine ===

impl Sortable for Customer {
    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "name" => Some(SortValue::Text(self.name.clone())),
            "email" => Some(SortValue::Text(self.email.clone())),
            "created_at" => Some(SortValue::Timestamp(self.created_at)),
            _ => None,
        }
    }
}

impl Sortable for Product {
    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "name" => Some(SortValue::Text(self.name.clone())),
            "price" => Some(SortValue::Number(self.price)),
            "stock" => Some(SortValue::Int(self.stock)),
            "created_at" => Some(SortValue::Timestamp(self.created_at)),
            _ => None,
        }
    }
}

impl Sortable for OrderDetail {
    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "order_date" => Some(SortValue::Timestamp(self.order.order_date)),
            "total_amount" => Some(SortValue::Number(self.order.total_amount)),
            "created_at" => Some(SortValue::Timestamp(self.order.created_at)),
            _ => None,
        }
    }
}

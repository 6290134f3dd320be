//! Storage-access interface for the CRM core
//!
//! The core never touches a concrete datastore; every read and write goes
//! through [`CrmStore`], which is injected into the query resolvers and
//! mutation handlers. The capability set is deliberately small: create,
//! get-by-id, list, a case-insensitive email probe, batched product lookup,
//! a low-stock scan, per-row product saves, and transactional order
//! creation with relation prefetch on reads.
//!
//! Transactional contract: `create_customer` and `create_product` are each
//! a single atomic row insert; `create_order` must create the row, set the
//! product associations, and persist the derived total as one unit, so a
//! failure partway leaves no partial order visible.

use crate::core::entity::{Customer, Order, OrderDetail, Product};
use crate::core::error::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Fields for a new customer row (already validated and normalized)
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Fields for a new product row (already validated)
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub stock: i64,
}

/// Fields for a new order. `product_ids` are pre-resolved database ids with
/// duplicates removed; the store computes the snapshot total itself from
/// the product prices it sees inside its transaction.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: i64,
    pub product_ids: Vec<i64>,
    pub order_date: DateTime<Utc>,
}

/// Service trait for the CRM datastore
///
/// Implementations provide storage for the three entity collections and
/// own id assignment, timestamps, and transaction scoping. The core is
/// agnostic to the underlying mechanism; tests substitute the in-memory
/// implementation.
#[async_trait]
pub trait CrmStore: Send + Sync {
    // === Customers ===

    /// Insert a new customer row (atomic)
    async fn create_customer(&self, new: NewCustomer) -> Result<Customer, StorageError>;

    /// Get a customer by database id
    async fn customer(&self, id: i64) -> Result<Option<Customer>, StorageError>;

    /// List all customers
    async fn customers(&self) -> Result<Vec<Customer>, StorageError>;

    /// Whether any customer already holds this email, compared
    /// case-insensitively
    async fn email_exists(&self, email: &str) -> Result<bool, StorageError>;

    // === Products ===

    /// Insert a new product row (atomic)
    async fn create_product(&self, new: NewProduct) -> Result<Product, StorageError>;

    /// Get a product by database id
    async fn product(&self, id: i64) -> Result<Option<Product>, StorageError>;

    /// List all products
    async fn products(&self) -> Result<Vec<Product>, StorageError>;

    /// Fetch the products matching `ids`; missing ids are simply absent
    /// from the result, the caller decides whether that is an error
    async fn products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>, StorageError>;

    /// Products with stock strictly below `threshold`
    async fn products_below_stock(&self, threshold: i64) -> Result<Vec<Product>, StorageError>;

    /// Persist one product row (used for per-row stock updates)
    async fn save_product(&self, product: Product) -> Result<Product, StorageError>;

    // === Orders ===

    /// Create an order atomically: the row, its product associations, and
    /// the snapshot total computed from current product prices inside the
    /// same transaction
    async fn create_order(&self, new: NewOrder) -> Result<OrderDetail, StorageError>;

    /// Get one order with its customer and products eager-loaded
    async fn order_with_relations(&self, id: i64) -> Result<Option<OrderDetail>, StorageError>;

    /// List all orders with customers and products eager-loaded
    async fn orders_with_relations(&self) -> Result<Vec<OrderDetail>, StorageError>;

    /// Re-sum the order's current product set and persist the new total
    async fn recalculate_order_total(&self, order_id: i64) -> Result<Order, StorageError>;
}

//! # CRM-RS
//!
//! A small business-data API core (customers, products, orders) exposed
//! through a query/mutation surface.
//!
//! The interesting part is the resolution layer, not the storage:
//!
//! - **Input normalization**: heterogeneous client structures collapse into
//!   one `NormalizedInput` mapping with empty fields stripped
//! - **Dual-form identifiers**: plain integers and relay-style base64
//!   global ids are accepted interchangeably on input
//! - **Validated filtering**: per-entity filter specs with aggregated
//!   shape errors and deduplicated conjunction predicates
//! - **Allow-listed ordering**: client sort requests checked against fixed
//!   field lists, with strays silently dropped
//! - **Transactional mutations**: single-row creates, batch creation with
//!   per-row partial-failure accounting, and cross-entity order creation
//!   with a derived price-snapshot total
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crm::prelude::*;
//! use serde_json::json;
//!
//! let store = Arc::new(InMemoryStore::new());
//!
//! let payload = api::create_customer(
//!     store.as_ref(),
//!     &json!({ "name": "Alice", "email": "alice@example.com" }),
//! )
//! .await?;
//! assert_eq!(payload.message, "Customer created successfully.");
//!
//! // Or serve the whole surface over HTTP:
//! server::serve(AppState { store }, "127.0.0.1:8000").await?;
//! ```

pub mod api;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and functions
pub mod prelude {
    // === Core types ===
    pub use crate::core::{
        CrmError, CrmResult, CrmStore, Customer, CustomerFilter, FilterValidationError,
        IdentifierError, NewCustomer, NewOrder, NewProduct, NormalizedInput, Order, OrderDetail,
        OrderFilter, Product, ProductFilter, StorageError, ValidationError,
    };

    // === API surface ===
    pub use crate::api;

    // === Storage ===
    pub use crate::storage::InMemoryStore;

    // === Config ===
    pub use crate::config::ApiConfig;

    // === Server ===
    pub use crate::server::{AppState, build_router, serve};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
}

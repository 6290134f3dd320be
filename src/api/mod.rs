//! Query and mutation surface of the CRM core
//!
//! Every operation takes the storage collaborator plus raw client values
//! (`serde_json::Value`), runs them through the resolution pipeline
//! (normalize → validate → resolve references → write → report), and
//! returns typed payloads or a [`crate::core::CrmError`].

pub mod mutations;
pub mod queries;

pub use mutations::{
    BulkCreateCustomersPayload, CreateCustomerPayload, LowStockPayload, bulk_create_customers,
    create_customer, create_order, create_product, recalculate_order_total,
    update_low_stock_products,
};
pub use queries::{all_customers, all_orders, all_products};

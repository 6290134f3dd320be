//! Query resolvers: fetch, filter, order
//!
//! Each resolver pulls the full collection from the store, applies the
//! validated filter predicate, then the allow-listed ordering. Orders are
//! fetched with their relations eager-loaded and deduplicated by id after
//! filtering, so an order matching a relation filter through more than one
//! product appears exactly once.

use crate::core::entity::{Customer, OrderDetail, Product};
use crate::core::error::CrmResult;
use crate::core::filter::{CustomerFilter, OrderFilter, ProductFilter};
use crate::core::ordering::{
    CUSTOMER_ORDER_FIELDS, ORDER_ORDER_FIELDS, PRODUCT_ORDER_FIELDS, apply_ordering,
    parse_order_spec,
};
use crate::core::store::CrmStore;
use serde_json::Value;
use std::collections::HashSet;

/// Resolve the customer collection
pub async fn all_customers(
    store: &dyn CrmStore,
    filter: Option<&Value>,
    order_by: Option<&Value>,
) -> CrmResult<Vec<Customer>> {
    let spec = CustomerFilter::from_input(filter)?;
    let mut rows = store.customers().await?;
    if !spec.is_empty() {
        rows.retain(|customer| spec.matches(customer));
    }
    let keys = parse_order_spec(order_by, CUSTOMER_ORDER_FIELDS);
    apply_ordering(&mut rows, &keys);
    Ok(rows)
}

/// Resolve the product collection
pub async fn all_products(
    store: &dyn CrmStore,
    filter: Option<&Value>,
    order_by: Option<&Value>,
) -> CrmResult<Vec<Product>> {
    let spec = ProductFilter::from_input(filter)?;
    let mut rows = store.products().await?;
    if !spec.is_empty() {
        rows.retain(|product| spec.matches(product));
    }
    let keys = parse_order_spec(order_by, PRODUCT_ORDER_FIELDS);
    apply_ordering(&mut rows, &keys);
    Ok(rows)
}

/// Resolve the order collection with customer and products eager-loaded
pub async fn all_orders(
    store: &dyn CrmStore,
    filter: Option<&Value>,
    order_by: Option<&Value>,
) -> CrmResult<Vec<OrderDetail>> {
    let spec = OrderFilter::from_input(filter)?;
    let mut rows = store.orders_with_relations().await?;
    if !spec.is_empty() {
        rows.retain(|detail| spec.matches(detail));
    }

    // Relation filters can fan out; keep each order once.
    let mut seen = HashSet::new();
    rows.retain(|detail| seen.insert(detail.order.id));

    let keys = parse_order_spec(order_by, ORDER_ORDER_FIELDS);
    apply_ordering(&mut rows, &keys);
    Ok(rows)
}

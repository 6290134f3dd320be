//! Mutation handlers
//!
//! Each handler follows the same implicit state machine:
//! normalize → validate → resolve references → write (transactional) →
//! report. Validation runs strictly before any write; by the time a store
//! transaction opens, the only failures left are storage faults, which
//! abort the whole unit.

use crate::core::entity::{Customer, Order, OrderDetail, Product};
use crate::core::error::{CrmError, CrmResult, ValidationError};
use crate::core::id::resolve_id;
use crate::core::input::NormalizedInput;
use crate::core::store::{CrmStore, NewCustomer, NewOrder, NewProduct};
use crate::core::validation::{
    ensure_unique_email, require_name, validate_phone, validate_price_and_stock,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Products with stock strictly below this are considered low
const LOW_STOCK_THRESHOLD: i64 = 10;
/// Fixed replenishment applied to each low-stock product
const RESTOCK_INCREMENT: i64 = 10;

/// Result of a successful customer creation
#[derive(Debug, Clone, Serialize)]
pub struct CreateCustomerPayload {
    pub customer: Customer,
    pub message: String,
}

/// Result of a bulk customer creation: both lists are always returned,
/// so callers see exactly which rows succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct BulkCreateCustomersPayload {
    pub customers: Vec<Customer>,
    pub errors: Vec<String>,
}

/// Result of the low-stock maintenance mutation
#[derive(Debug, Clone, Serialize)]
pub struct LowStockPayload {
    pub products: Vec<Product>,
    pub message: String,
}

/// Shared creation path for single and bulk customer mutations.
///
/// Validation order matters for the reported error: name, then email
/// uniqueness, then phone.
async fn create_customer_record(
    store: &dyn CrmStore,
    input: &NormalizedInput,
) -> CrmResult<Customer> {
    let name = require_name(input.str_field("name").unwrap_or_default())?;
    let email = ensure_unique_email(store, input.str_field("email").unwrap_or_default()).await?;
    let phone = match input.get("phone") {
        Some(value) => Some(value.as_str().ok_or_else(|| {
            ValidationError::new("phone", "Phone must match +1234567890 or 123-456-7890.")
        })?),
        None => None,
    };
    validate_phone(phone)?;

    Ok(store
        .create_customer(NewCustomer {
            name,
            email,
            phone: phone.unwrap_or_default().to_string(),
        })
        .await?)
}

/// Create one customer; fails without persisting anything on any rule
/// violation.
pub async fn create_customer(
    store: &dyn CrmStore,
    input: &Value,
) -> CrmResult<CreateCustomerPayload> {
    let payload = NormalizedInput::coerce(Some(input));
    let customer = create_customer_record(store, &payload).await?;
    tracing::info!(customer_id = customer.id, "customer created");
    Ok(CreateCustomerPayload {
        customer,
        message: "Customer created successfully.".to_string(),
    })
}

/// Create many customers with partial-failure accounting.
///
/// Each row is normalized, validated, and written independently; a failing
/// row becomes a `"Row {n}: {message}"` entry (1-based) and never disturbs
/// its neighbours. Only business-rule failures are converted to row
/// errors; storage faults still abort the batch.
pub async fn bulk_create_customers(
    store: &dyn CrmStore,
    inputs: &[Value],
) -> CrmResult<BulkCreateCustomersPayload> {
    let mut customers = Vec::new();
    let mut errors = Vec::new();

    for (index, input) in inputs.iter().enumerate() {
        let row = index + 1;
        let normalized = NormalizedInput::coerce(Some(input));
        match create_customer_record(store, &normalized).await {
            Ok(customer) => customers.push(customer),
            Err(CrmError::Validation(err)) => errors.push(format!("Row {}: {}", row, err)),
            Err(other) => return Err(other),
        }
    }

    tracing::info!(
        created = customers.len(),
        failed = errors.len(),
        "bulk customer creation finished"
    );
    Ok(BulkCreateCustomersPayload { customers, errors })
}

/// Create one product
pub async fn create_product(store: &dyn CrmStore, input: &Value) -> CrmResult<Product> {
    let payload = NormalizedInput::coerce(Some(input));

    let Some(price_value) = payload.get("price") else {
        return Err(ValidationError::new("price", "Price is required.").into());
    };
    let price = parse_decimal(price_value)
        .ok_or_else(|| ValidationError::new("price", "Price must be a positive value."))?;

    let stock = match payload.get("stock") {
        Some(value) => value
            .as_i64()
            .ok_or_else(|| ValidationError::new("stock", "Stock must be a whole number."))?,
        None => 0,
    };
    validate_price_and_stock(Some(price), Some(stock))?;

    let name = payload.str_field("name").unwrap_or_default().trim().to_string();
    if name.is_empty() {
        return Err(ValidationError::new("name", "Product name is required.").into());
    }

    let product = store
        .create_product(NewProduct { name, price, stock })
        .await?;
    tracing::info!(product_id = product.id, "product created");
    Ok(product)
}

/// Create an order across customer and product references.
///
/// All referential lookups happen before the transactional write: the
/// customer must exist, and every product id must resolve (missing ids
/// are reported all at once). The store then creates the row, the product
/// associations, and the snapshot total as one atomic unit.
pub async fn create_order(store: &dyn CrmStore, input: &Value) -> CrmResult<OrderDetail> {
    let payload = NormalizedInput::coerce(Some(input));

    let raw_ids = match payload.get("product_ids") {
        Some(Value::Array(items)) if !items.is_empty() => items.clone(),
        _ => {
            return Err(
                ValidationError::new("product_ids", "At least one product ID is required.").into(),
            );
        }
    };

    let customer_id = resolve_id(payload.get("customer_id"), "Customer")?;
    let customer = store
        .customer(customer_id)
        .await?
        .ok_or(CrmError::NotFound {
            entity_type: "Customer",
            id: customer_id,
        })?;

    let mut product_ids = Vec::with_capacity(raw_ids.len());
    for raw in &raw_ids {
        let id = resolve_id(Some(raw), "Product")?;
        if !product_ids.contains(&id) {
            product_ids.push(id);
        }
    }

    let products = store.products_by_ids(&product_ids).await?;
    let found: HashSet<i64> = products.iter().map(|product| product.id).collect();
    let mut missing: Vec<i64> = product_ids
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        let listed = missing
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(
            ValidationError::new("product_ids", format!("Invalid product ID(s): {}", listed))
                .into(),
        );
    }

    let order_date = match payload.get("order_date") {
        Some(value) => parse_datetime(value).ok_or_else(|| {
            ValidationError::new("order_date", "Order date must be an ISO-8601 datetime.")
        })?,
        None => Utc::now(),
    };

    let detail = store
        .create_order(NewOrder {
            customer_id: customer.id,
            product_ids,
            order_date,
        })
        .await?;
    tracing::info!(
        order_id = detail.order.id,
        total = %detail.order.total_amount,
        "order created"
    );
    Ok(detail)
}

/// Re-derive one order's total from its current product set
pub async fn recalculate_order_total(store: &dyn CrmStore, raw_id: &Value) -> CrmResult<Order> {
    let order_id = resolve_id(Some(raw_id), "Order")?;
    if store.order_with_relations(order_id).await?.is_none() {
        return Err(CrmError::NotFound {
            entity_type: "Order",
            id: order_id,
        });
    }
    let order = store.recalculate_order_total(order_id).await?;
    tracing::info!(order_id = order.id, total = %order.total_amount, "order total recalculated");
    Ok(order)
}

/// Bulk-adjust low-stock inventory.
///
/// Every product with stock below 10 gets +10, persisted row by row so each
/// update individually succeeds or fails. Deliberately not idempotent by
/// call count: invoking it again while stock is still low applies the
/// increment again.
pub async fn update_low_stock_products(store: &dyn CrmStore) -> CrmResult<LowStockPayload> {
    let low = store.products_below_stock(LOW_STOCK_THRESHOLD).await?;
    let mut products = Vec::with_capacity(low.len());
    for mut product in low {
        product.stock += RESTOCK_INCREMENT;
        products.push(store.save_product(product).await?);
    }

    let message = format!("Updated {} products with low stock.", products.len());
    tracing::info!(updated = products.len(), "low-stock replenishment ran");
    Ok(LowStockPayload { products, message })
}

fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_datetime(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

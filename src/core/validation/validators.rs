//! Per-entity business-rule validators
//!
//! Messages here are part of the API contract; clients and the bulk
//! mutation's row reports both surface them verbatim.

use crate::core::error::{CrmResult, ValidationError};
use crate::core::store::CrmStore;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

/// Accepted phone shapes: international (+ then 7-15 digits) or US dashed
/// (###-###-####).
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+\d{7,15}|\d{3}-\d{3}-\d{4})$").expect("valid phone regex"));

/// Require a non-blank customer name; returns the trimmed value.
pub fn require_name(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("name", "Name is required."));
    }
    Ok(trimmed.to_string())
}

/// Validate an optional phone number against the accepted patterns.
pub fn validate_phone(phone: Option<&str>) -> Result<(), ValidationError> {
    match phone {
        Some(value) if !PHONE_PATTERN.is_match(value) => Err(ValidationError::new(
            "phone",
            "Phone must match +1234567890 or 123-456-7890.",
        )),
        _ => Ok(()),
    }
}

/// Joint price/stock validation for product creation.
///
/// Price must be present and strictly positive; stock, when present, must
/// not be negative.
pub fn validate_price_and_stock(
    price: Option<Decimal>,
    stock: Option<i64>,
) -> Result<(), ValidationError> {
    match price {
        Some(value) if value > Decimal::ZERO => {}
        _ => {
            return Err(ValidationError::new(
                "price",
                "Price must be a positive value.",
            ));
        }
    }
    if let Some(value) = stock {
        if value < 0 {
            return Err(ValidationError::new("stock", "Stock cannot be negative."));
        }
    }
    Ok(())
}

/// Trim an email, require it non-blank, and require that no customer
/// already holds it (case-insensitively). Returns the trimmed value with
/// its original casing preserved.
pub async fn ensure_unique_email(store: &dyn CrmStore, email: &str) -> CrmResult<String> {
    let cleaned = email.trim();
    if cleaned.is_empty() {
        return Err(ValidationError::new("email", "Email is required.").into());
    }
    if store.email_exists(cleaned).await? {
        return Err(ValidationError::new("email", "Email already exists.").into());
    }
    Ok(cleaned.to_string())
}

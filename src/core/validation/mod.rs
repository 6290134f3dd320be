//! Business-rule validation
//!
//! Validators run after input normalization and strictly before any write.
//! They are safe to call repeatedly; the only one touching storage is the
//! email uniqueness check, which reads but never mutates.

pub mod validators;

pub use validators::{
    ensure_unique_email, require_name, validate_phone, validate_price_and_stock,
};

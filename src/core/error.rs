//! Typed error handling for the CRM core
//!
//! Every failure a caller can see falls into one of four client-visible
//! categories plus a storage category:
//!
//! - [`ValidationError`]: client input violates a business rule
//! - `NotFound`: a referenced entity id does not resolve to a row
//! - [`IdentifierError`]: malformed or missing id string/token
//! - [`FilterValidationError`]: a filter specification fails shape checks
//! - [`StorageError`]: storage collaborator faults
//!
//! Validation errors carry a tagged `field` so callers (notably the bulk
//! customer mutation) can match on the kind instead of inspecting message
//! strings.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for the CRM core
#[derive(Debug)]
pub enum CrmError {
    /// Client input violates a business rule
    Validation(ValidationError),

    /// A referenced entity does not exist
    NotFound { entity_type: &'static str, id: i64 },

    /// Malformed or missing identifier
    Identifier(IdentifierError),

    /// Filter specification failed shape/type validation
    Filter(FilterValidationError),

    /// Storage backend errors
    Storage(StorageError),
}

impl fmt::Display for CrmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrmError::Validation(e) => write!(f, "{}", e),
            CrmError::NotFound { entity_type, id } => {
                write!(f, "{} with id {} not found.", entity_type, id)
            }
            CrmError::Identifier(e) => write!(f, "{}", e),
            CrmError::Filter(e) => write!(f, "{}", e),
            CrmError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CrmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CrmError::Validation(e) => Some(e),
            CrmError::Identifier(e) => Some(e),
            CrmError::Filter(e) => Some(e),
            CrmError::Storage(e) => Some(e),
            CrmError::NotFound { .. } => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CrmError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CrmError::Validation(_) => StatusCode::BAD_REQUEST,
            CrmError::NotFound { .. } => StatusCode::NOT_FOUND,
            CrmError::Identifier(_) => StatusCode::BAD_REQUEST,
            CrmError::Filter(_) => StatusCode::BAD_REQUEST,
            CrmError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CrmError::Validation(_) => "VALIDATION_ERROR",
            CrmError::NotFound { .. } => "NOT_FOUND",
            CrmError::Identifier(_) => "INVALID_IDENTIFIER",
            CrmError::Filter(_) => "FILTER_VALIDATION_ERROR",
            CrmError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            CrmError::Validation(e) => Some(serde_json::json!({ "field": e.field })),
            CrmError::NotFound { entity_type, id } => Some(serde_json::json!({
                "entity_type": entity_type,
                "id": id,
            })),
            CrmError::Filter(e) => Some(serde_json::json!({ "errors": e.errors })),
            _ => None,
        }
    }
}

impl IntoResponse for CrmError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A business-rule violation on a single input field.
///
/// `Display` yields the bare human-readable message (no field prefix) so the
/// bulk mutation can report rows exactly as "Row 2: Email already exists."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for CrmError {
    fn from(err: ValidationError) -> Self {
        CrmError::Validation(err)
    }
}

// =============================================================================
// Identifier Errors
// =============================================================================

/// Errors raised by the identifier resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The identifier was absent, null, or empty
    Missing { label: String },

    /// The identifier was neither a plain integer nor a decodable global id
    Malformed { label: String },
}

impl fmt::Display for IdentifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierError::Missing { label } => write!(f, "{} ID is required.", label),
            IdentifierError::Malformed { label } => write!(f, "Invalid {} ID", label),
        }
    }
}

impl std::error::Error for IdentifierError {}

impl From<IdentifierError> for CrmError {
    fn from(err: IdentifierError) -> Self {
        CrmError::Identifier(err)
    }
}

// =============================================================================
// Filter Validation Errors
// =============================================================================

/// Aggregated shape/type errors for a filter specification.
///
/// All field-level problems are collected before failing, so a client sees
/// every mistake at once rather than one per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterValidationError {
    pub errors: Vec<String>,
}

impl FilterValidationError {
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }
}

impl fmt::Display for FilterValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.errors.join("; "))
    }
}

impl std::error::Error for FilterValidationError {}

impl From<FilterValidationError> for CrmError {
    fn from(err: FilterValidationError) -> Self {
        CrmError::Filter(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by storage backends
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("{entity_type} row with id {id} does not exist")]
    MissingRow { entity_type: &'static str, id: i64 },

    #[error("transaction aborted: {0}")]
    TransactionAborted(String),
}

impl From<StorageError> for CrmError {
    fn from(err: StorageError) -> Self {
        CrmError::Storage(err)
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for CRM core operations
pub type CrmResult<T> = Result<T, CrmError>;

//! Query-string parameters and pagination envelope
//!
//! Pagination is a transport concern: the resolvers return full sequences
//! and the HTTP layer slices them. Filters arrive as a JSON object string
//! and ordering as the comma-joined field list the Ordering Engine parses.
//!
//! # Example
//! ```text
//! GET /products?filter={"price_gte":"10.00"}&order_by=-price,name&page=2&limit=10
//! ```

use crate::core::error::{CrmResult, FilterValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters accepted by every collection endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListParams {
    /// Page number (starts at 1)
    #[serde(default = "default_page")]
    pub page: usize,

    /// Number of items per page
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Filter specification as a JSON object string
    pub filter: Option<String>,

    /// Comma-joined order fields, `-` prefix for descending
    pub order_by: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    20
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            filter: None,
            order_by: None,
        }
    }
}

impl ListParams {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get limit, clamped to at most 100 per page
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, 100)
    }

    /// Parse the filter string into a JSON value.
    ///
    /// A present-but-unparsable filter is a client error, reported through
    /// the same channel as field-level filter problems.
    pub fn filter_value(&self) -> CrmResult<Option<Value>> {
        match &self.filter {
            None => Ok(None),
            Some(raw) => serde_json::from_str(raw).map(Some).map_err(|_| {
                FilterValidationError::new(vec!["filter must be a JSON object".to_string()]).into()
            }),
        }
    }

    /// The order specification as a value for the Ordering Engine
    pub fn order_value(&self) -> Option<Value> {
        self.order_by.clone().map(Value::String)
    }
}

/// Paginated response structure
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Slice a fully resolved collection into one page. Pages past the end
    /// of the collection come back empty; the skip math saturates so an
    /// absurd client page number cannot overflow.
    pub fn paginate(rows: Vec<T>, params: &ListParams) -> Self {
        let page = params.page();
        let limit = params.limit();
        let total = rows.len();
        let data = rows
            .into_iter()
            .skip(page.saturating_sub(1).saturating_mul(limit))
            .take(limit)
            .collect();
        Self {
            data,
            pagination: PaginationMeta::new(page, limit, total),
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let limit = limit.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = page.saturating_sub(1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }
}

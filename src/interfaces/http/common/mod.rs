//! Shared HTTP building blocks: response envelope, error mapping, extractors

mod error;
mod validated_json;

use serde::{Deserialize, Serialize};

use crate::shared::{PaginatedResult, PaginationParams};

pub use error::{domain_error_response, status_for};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

/// Standard API response envelope
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Pagination query parameters (`?page=&limit=`)
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

impl From<PaginationQuery> for PaginationParams {
    fn from(q: PaginationQuery) -> Self {
        PaginationParams::new(q.page, q.limit)
    }
}

/// Paginated list payload
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T, U> From<PaginatedResult<U>> for PaginatedResponse<T>
where
    T: From<U>,
{
    fn from(r: PaginatedResult<U>) -> Self {
        let r = r.map(T::from);
        Self {
            items: r.items,
            total: r.total,
            page: r.page,
            limit: r.limit,
            total_pages: r.total_pages,
        }
    }
}

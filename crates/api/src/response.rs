//! Shared response envelope types for API handlers.
//!
//! All success responses use a `{ "success": true, "data": ... }` envelope;
//! paginated listings add a `"pagination"` block. Use these typed wrappers
//! instead of ad-hoc `serde_json::json!` so serialization stays consistent.

use serde::Serialize;

/// Standard `{ "success": true, "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Pagination block attached to paginated listings.
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    /// Derive the page count from a total match count.
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

/// Paginated `{ "success": true, "data": [...], "pagination": {...} }`
/// envelope.
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(data: Vec<T>, pagination: Pagination) -> Self {
        Self {
            success: true,
            data,
            pagination,
        }
    }
}

/// `{ "success": true, "data": { "message": ... } }` for delete
/// confirmations.
#[derive(Debug, Serialize)]
pub struct MessageData {
    pub message: &'static str,
}

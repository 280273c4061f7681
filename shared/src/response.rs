//! API response types
//!
//! Standardized response structures for the entire API surface.
//!
//! All responses follow this format:
//! ```json
//! {
//!     "status": "success",
//!     "data": { ... }
//! }
//! ```
//! Error responses carry `status: "error"` plus a `message`; list responses
//! additionally carry `pagination`.

use serde::{Deserialize, Serialize};

/// Unified API response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// `"success"` or `"error"`.
    pub status: String,
    /// Human-readable message (errors, occasional confirmations).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Present on list responses only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            data: Some(data),
            pagination: None,
        }
    }

    /// Create a successful list response with pagination metadata.
    pub fn ok_paginated(data: T, pagination: Pagination) -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            data: Some(data),
            pagination: Some(pagination),
        }
    }

    /// Create an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
            data: None,
            pagination: None,
        }
    }
}

/// Pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number (1-based).
    pub page: u32,
    /// Items per page.
    pub limit: u32,
    /// Total number of matching items (pre-pagination).
    pub total: u64,
    /// Total number of pages.
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit > 0 {
            ((total as f64) / (limit as f64)).ceil() as u32
        } else {
            0
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// A page of results plus its pagination metadata, as returned by the
/// query engine before the HTTP envelope is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        Self {
            data,
            pagination: Pagination::new(page, limit, total),
        }
    }
}

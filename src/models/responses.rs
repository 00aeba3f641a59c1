//! Response DTOs for the property API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::properties::PropertyRecord;

/// Response body for `GET /properties/`
#[derive(Debug, Clone, Serialize)]
pub struct PropertyListResponse {
    pub data: Vec<PropertyRecord>,
}

impl PropertyListResponse {
    pub fn new(data: Vec<PropertyRecord>) -> Self {
        Self { data }
    }
}

/// Response body for `DELETE /properties/:id`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// Id of the deleted property
    pub id: u64,
}

impl DeleteResponse {
    pub fn new(id: u64) -> Self {
        Self {
            message: format!("Property {} deleted successfully", id),
            id,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

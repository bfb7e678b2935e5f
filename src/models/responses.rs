//! Response DTOs for the lookup API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for `GET /lookup/:source/:key`
///
/// A key the source does not know is a successful lookup with `found: false`.
#[derive(Debug, Clone, Serialize)]
pub struct LookupResponse {
    /// Source that answered
    pub source: String,
    /// The requested key
    pub key: String,
    /// Whether the source resolved the key
    pub found: bool,
    /// Resolved value, null when not found
    pub value: Option<String>,
}

impl LookupResponse {
    pub fn new(source: impl Into<String>, key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            source: source.into(),
            key: key.into(),
            found: value.is_some(),
            value,
        }
    }
}

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Cache statistics per source, null for uncached sources
    pub sources: BTreeMap<String, Option<CacheStats>>,
}

/// Response body for `DELETE /cache/:source`
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    pub source: String,
    /// False when the source has no cache
    pub cleared: bool,
}

impl ClearResponse {
    pub fn new(source: impl Into<String>, cleared: bool) -> Self {
        let source = source.into();
        let message = if cleared {
            format!("Cache for '{}' cleared", source)
        } else {
            format!("Source '{}' is not cached", source)
        };
        Self {
            message,
            source,
            cleared,
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

//! Request DTOs for the lookup API
//!
//! Query parameters accepted by the HTTP endpoints.

use std::time::Duration;

use serde::Deserialize;

/// Query string for `GET /lookup/:source/:key`
///
/// # Fields
/// - `timeout_ms`: Optional deadline for the whole lookup, in milliseconds
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupQuery {
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl LookupQuery {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

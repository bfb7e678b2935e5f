//! Error types
//!
//! Lookup, configuration and HTTP errors, built with thiserror. The cache
//! itself is infallible and has no error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Lookup Error ==
/// Why a lookup could not be completed.
///
/// "Not found" is not an error: sources report it as `Ok(None)`. Errors are
/// never cached.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The caller's context was cancelled
    #[error("lookup cancelled")]
    Cancelled,

    /// The caller's or the source's deadline elapsed
    #[error("lookup deadline exceeded")]
    DeadlineExceeded,

    /// The source cannot interpret the key
    #[error("invalid lookup key: {0}")]
    InvalidKey(String),

    /// The backing system failed
    #[error("lookup backend failed: {0}")]
    Backend(String),
}

// == Config Error ==
/// Invalid configuration detected at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid record type {0:?}, only PTR is supported")]
    InvalidRecordType(String),

    #[error("invalid DNS server {0:?}, expected ip or ip:port")]
    InvalidServer(String),

    #[error("server port must not be 0")]
    InvalidPort,

    #[error("invalid {name} cache: {reason}")]
    InvalidCache { name: String, reason: String },

    #[error("invalid static mapping {0:?}, expected key=value")]
    InvalidMapping(String),

    #[error("lookup source {0:?} is registered twice")]
    DuplicateSource(String),
}

// == API Error ==
/// Errors returned by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unknown lookup source: {0}")]
    UnknownSource(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::UnknownSource(_) => StatusCode::NOT_FOUND,
            ApiError::Lookup(LookupError::InvalidKey(_)) => StatusCode::BAD_REQUEST,
            ApiError::Lookup(LookupError::DeadlineExceeded) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Lookup(LookupError::Cancelled) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Lookup(LookupError::Backend(_)) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

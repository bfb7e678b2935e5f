//! API Module
//!
//! HTTP handlers and routing for the lookup service.
//!
//! # Endpoints
//! - `GET /lookup/:source/:key` - Resolve a key through a source
//! - `GET /stats` - Cache statistics per source
//! - `DELETE /cache/:source` - Clear a source's cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

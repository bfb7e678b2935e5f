//! Request and Response models for the lookup API
//!
//! DTOs used for serializing/deserializing HTTP query strings and bodies.

pub mod requests;
pub mod responses;

pub use requests::LookupQuery;
pub use responses::{ClearResponse, HealthResponse, LookupResponse, StatsResponse};

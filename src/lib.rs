//! Lookup Cache - memoizing layer for slow or fallible lookups
//!
//! Provides a bounded cache with TTL expiration, negative caching and LRU
//! eviction, a decorator that adds it to any [`lookup::Lookup`], and a small
//! HTTP service exposing cached lookup sources.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod lookup;
pub mod models;
pub mod sources;

pub use api::AppState;
pub use cache::{Cache, CacheConfig, CacheLookup};
pub use config::Config;
pub use error::LookupError;
pub use lookup::{lookup_fn, wrap_with_cache, Lookup, LookupContext, SharedLookup};

//! Cache Module
//!
//! Bounded in-memory store of lookup outcomes with TTL expiration, negative
//! caching and LRU eviction.

mod config;
mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use config::{CacheConfig, DEFAULT_CACHE_SIZE};
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::{Cache, CacheLookup};

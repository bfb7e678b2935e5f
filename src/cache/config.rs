//! Cache Configuration Module
//!
//! Parameters a lookup source hands to [`Cache::new`](super::Cache::new).

use std::time::Duration;

use crate::error::ConfigError;

/// Capacity used when a configuration asks for a zero-sized cache.
pub const DEFAULT_CACHE_SIZE: usize = 1000;

// == Cache Config ==
/// Settings for one cache instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// When false, [`wrap_with_cache`](crate::lookup::wrap_with_cache) leaves the lookup untouched
    pub enabled: bool,
    /// Maximum resident entries, 0 = [`DEFAULT_CACHE_SIZE`]
    pub size: usize,
    /// Lifetime of positive entries, zero = never expire
    pub ttl: Duration,
    /// Lifetime of "not found" entries, zero = do not cache them at all
    pub negative_ttl: Duration,
}

impl CacheConfig {
    // == Constructor ==
    /// Creates an enabled config with the given capacity and positive TTL.
    ///
    /// Negative caching starts disabled; chain [`with_negative_ttl`](Self::with_negative_ttl)
    /// to turn it on.
    pub fn enabled(size: usize, ttl: Duration) -> Self {
        Self {
            enabled: true,
            size,
            ttl,
            negative_ttl: Duration::ZERO,
        }
    }

    /// Sets the lifetime of negative entries.
    pub fn with_negative_ttl(mut self, negative_ttl: Duration) -> Self {
        self.negative_ttl = negative_ttl;
        self
    }

    // == Capacity ==
    /// Returns the normalized capacity.
    pub fn capacity(&self) -> usize {
        if self.size == 0 {
            DEFAULT_CACHE_SIZE
        } else {
            self.size
        }
    }

    /// True when "not found" outcomes are stored.
    pub fn caches_negative(&self) -> bool {
        !self.negative_ttl.is_zero()
    }

    // == Validation ==
    /// Rejects settings an enabled cache cannot honor sensibly.
    ///
    /// A "not found" answer must not outlive a found one: with a finite TTL,
    /// the negative TTL may not exceed it. Disabled configs always pass.
    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }
        if !self.ttl.is_zero() && self.negative_ttl > self.ttl {
            return Err(ConfigError::InvalidCache {
                name: name.to_string(),
                reason: format!(
                    "negative ttl {:?} exceeds ttl {:?}",
                    self.negative_ttl, self.ttl
                ),
            });
        }
        Ok(())
    }
}

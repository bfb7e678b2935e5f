//! Cache Entry Module
//!
//! One memoized lookup outcome with its optional expiry.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored outcome: `Some(value)` for a resolved key, `None` for a negative result.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Resolved value, `None` = the lookup reported "not found"
    pub value: Option<V>,
    /// Expiration instant, None = no expiration
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry that lives for `ttl`; a zero TTL never expires.
    pub fn new(value: Option<V>, ttl: Duration) -> Self {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            Some(Instant::now() + ttl)
        };

        Self { value, expires_at }
    }

    /// Whether the original lookup resolved the key.
    pub fn found(&self) -> bool {
        self.value.is_some()
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is live at `expires_at` and expired strictly after it.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub(crate) fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now > expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if the entry never expires.
    ///
    /// Returns `Some(Duration::ZERO)` once expired.
    #[cfg(test)]
    pub(crate) fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}

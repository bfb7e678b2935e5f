//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::time::Instant;

use parking_lot::RwLock;
use tracing::trace;

use crate::cache::stats::StatsRecorder;
use crate::cache::{CacheConfig, CacheEntry, CacheStats, LruTracker};

// == Cache Lookup ==
/// Result of [`Cache::get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<V> {
    /// Live positive entry
    Found(V),
    /// Live negative entry: the source said the key does not exist
    NotFound,
    /// Nothing usable cached (absent or expired)
    Miss,
}

impl<V> CacheLookup<V> {
    pub fn is_hit(&self) -> bool {
        !matches!(self, CacheLookup::Miss)
    }

    /// Converts a hit into the lookup outcome it memoizes, `None` on a miss.
    pub fn into_outcome(self) -> Option<Option<V>> {
        match self {
            CacheLookup::Found(value) => Some(Some(value)),
            CacheLookup::NotFound => Some(None),
            CacheLookup::Miss => None,
        }
    }
}

/// Map and recency order; always mutated together under one write lock.
#[derive(Debug)]
struct CacheInner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    lru: LruTracker,
}

impl<V> CacheInner<V> {
    fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            true
        } else {
            false
        }
    }
}

// == Cache ==
/// Bounded, thread-safe store of lookup outcomes with TTL and LRU eviction.
///
/// Expired entries are purged lazily when read; there is no background sweeper.
/// Share it between tasks behind an `Arc`.
#[derive(Debug)]
pub struct Cache<V> {
    config: CacheConfig,
    capacity: usize,
    inner: RwLock<CacheInner<V>>,
    stats: StatsRecorder,
}

impl<V: Clone> Cache<V> {
    // == Constructor ==
    /// Creates an empty cache. A configured size of 0 becomes the default capacity.
    pub fn new(config: CacheConfig) -> Self {
        let capacity = config.capacity();
        Self {
            config,
            capacity,
            inner: RwLock::new(CacheInner {
                entries: HashMap::with_capacity(capacity),
                lru: LruTracker::with_capacity(capacity),
            }),
            stats: StatsRecorder::default(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Get ==
    /// Looks up a key.
    ///
    /// Hits are served under the shared lock. An expired entry counts as a miss
    /// and is removed under the exclusive lock.
    pub fn get(&self, key: &str) -> CacheLookup<V> {
        let now = Instant::now();
        {
            let inner = self.inner.read();
            match inner.entries.get(key) {
                None => {
                    self.stats.record_miss();
                    return CacheLookup::Miss;
                }
                Some(entry) if !entry.is_expired_at(now) => {
                    return match &entry.value {
                        Some(value) => {
                            self.stats.record_hit();
                            CacheLookup::Found(value.clone())
                        }
                        None => {
                            self.stats.record_negative_hit();
                            CacheLookup::NotFound
                        }
                    };
                }
                Some(_) => {}
            }
        }

        self.purge_expired(key);
        self.stats.record_miss();
        CacheLookup::Miss
    }

    fn purge_expired(&self, key: &str) {
        let purged = {
            let mut inner = self.inner.write();
            // A set may have refreshed the key between the two lock acquisitions
            let still_expired = inner
                .entries
                .get(key)
                .is_some_and(|entry| entry.is_expired());
            still_expired && inner.remove(key)
        };

        if purged {
            self.stats.record_expiration();
            trace!(key, "purged expired cache entry");
        }
    }

    // == Set ==
    /// Stores a lookup outcome: `Some(value)` when found, `None` when not found.
    ///
    /// Negative outcomes are dropped when the negative TTL is zero. Overwriting
    /// an existing key refreshes its recency. Inserting a new key into a full
    /// cache evicts from the least recently used end.
    pub fn set(&self, key: &str, value: Option<V>) {
        let ttl = if value.is_some() {
            self.config.ttl
        } else if self.config.caches_negative() {
            self.config.negative_ttl
        } else {
            return;
        };
        let entry = CacheEntry::new(value, ttl);

        let evicted = {
            let mut guard = self.inner.write();
            let inner = &mut *guard;

            if let Some(existing) = inner.entries.get_mut(key) {
                *existing = entry;
                inner.lru.touch(key);
                return;
            }

            let mut evicted = Vec::new();
            while inner.entries.len() >= self.capacity {
                let Some(oldest) = inner.lru.evict_oldest() else {
                    break;
                };
                inner.entries.remove(&oldest);
                evicted.push(oldest);
            }

            inner.entries.insert(key.to_string(), entry);
            inner.lru.touch(key);
            evicted
        };

        // Guard released: subscribers may call back into the cache
        for oldest in evicted {
            self.stats.record_eviction();
            trace!(key = %oldest, "evicted least recently used cache entry");
        }
    }

    // == Clear ==
    /// Drops every entry.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.entries.clear();
        inner.lru.clear();
    }

    // == Length ==
    /// Resident entries, counting expired ones that have not been read since.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }

    /// Panics if the map and the recency order have drifted apart.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let inner = self.inner.read();
        assert_eq!(inner.entries.len(), inner.lru.len(), "map and order differ in size");
        for key in inner.entries.keys() {
            assert!(inner.lru.contains(key), "key {key} missing from recency order");
        }
        assert!(inner.entries.len() <= self.capacity, "capacity exceeded");
    }
}

//! Caching Decorator
//!
//! Wraps any [`Lookup`] with a [`Cache`] without changing its contract.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;

use crate::cache::Cache;
use crate::error::LookupError;
use crate::lookup::{Lookup, LookupContext, SharedLookup};

// == Cached Lookup ==
/// A lookup that answers from the cache when it can and memoizes the rest.
///
/// - Hits, positive or negative, never call the inner lookup.
/// - Successful outcomes are stored; negative ones subject to the cache's negative TTL.
/// - Errors are returned as-is and never stored.
pub struct CachedLookup<L: Lookup> {
    cache: Arc<Cache<L::Value>>,
    inner: L,
}

impl<L: Lookup> CachedLookup<L> {
    pub fn new(cache: Arc<Cache<L::Value>>, inner: L) -> Self {
        Self { cache, inner }
    }

    pub fn cache(&self) -> &Arc<Cache<L::Value>> {
        &self.cache
    }
}

#[async_trait]
impl<L: Lookup> Lookup for CachedLookup<L> {
    type Value = L::Value;

    async fn lookup(
        &self,
        ctx: &LookupContext,
        key: &str,
    ) -> Result<Option<Self::Value>, LookupError> {
        if let Some(outcome) = self.cache.get(key).into_outcome() {
            trace!(key, found = outcome.is_some(), "lookup served from cache");
            return Ok(outcome);
        }

        let outcome = self.inner.lookup(ctx, key).await?;
        self.cache.set(key, outcome.clone());
        Ok(outcome)
    }
}

// == Wrap With Cache ==
/// Decorates `inner` with `cache`.
///
/// Without a cache, or with a disabled one, `inner` is returned as-is and
/// every call goes straight through.
///
/// ```ignore
/// let cache = Arc::new(Cache::new(
///     CacheConfig::enabled(1000, Duration::from_secs(300))
///         .with_negative_ttl(Duration::from_secs(60)),
/// ));
/// let cached = wrap_with_cache(Some(cache), my_lookup);
/// ```
pub fn wrap_with_cache<L>(cache: Option<Arc<Cache<L::Value>>>, inner: L) -> SharedLookup<L::Value>
where
    L: Lookup + 'static,
{
    if let Some(cache) = cache.filter(|cache| cache.is_enabled()) {
        return Arc::new(CachedLookup::new(cache, inner));
    }
    Arc::new(inner)
}

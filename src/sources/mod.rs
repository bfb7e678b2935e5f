//! Lookup Sources
//!
//! Named lookups consumed by the HTTP host, each optionally decorated with
//! its own cache.
//!
//! # Sources
//! - `dns`: reverse (PTR) resolution of IP addresses to hostnames
//! - `static`: fixed key/value mapping from configuration

pub mod dns;
pub mod static_map;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::cache::{Cache, CacheConfig, CacheStats};
use crate::config::Config;
use crate::error::{ConfigError, LookupError};
use crate::lookup::{wrap_with_cache, Lookup, LookupContext, SharedLookup};

// == Source ==
/// A named lookup plus the cache it was wrapped with, if any.
pub struct Source<V> {
    name: String,
    inner: SharedLookup<V>,
    cache: Option<Arc<Cache<V>>>,
}

impl<V> Source<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Builds a source, caching `lookup` when `cache_config` is enabled.
    pub fn new<L>(name: impl Into<String>, lookup: L, cache_config: &CacheConfig) -> Self
    where
        L: Lookup<Value = V> + 'static,
    {
        let name = name.into();
        let cache = cache_config
            .enabled
            .then(|| Arc::new(Cache::new(cache_config.clone())));

        if let Some(cache) = &cache {
            info!(
                source = %name,
                capacity = cache.capacity(),
                ttl_ms = cache.config().ttl.as_millis() as u64,
                negative_ttl_ms = cache.config().negative_ttl.as_millis() as u64,
                "lookup source cache enabled"
            );
        }

        Self {
            inner: wrap_with_cache(cache.clone(), lookup),
            name,
            cache,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn lookup(&self, ctx: &LookupContext, key: &str) -> Result<Option<V>, LookupError> {
        self.inner.lookup(ctx, key).await
    }

    pub fn cache(&self) -> Option<&Arc<Cache<V>>> {
        self.cache.as_ref()
    }

    /// Cache statistics, None for an uncached source.
    pub fn stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }

    /// Empties the cache. Returns false for an uncached source.
    pub fn clear_cache(&self) -> bool {
        match &self.cache {
            Some(cache) => {
                cache.clear();
                true
            }
            None => false,
        }
    }
}

// == Source Registry ==
/// Sources addressable by name.
pub struct SourceRegistry<V> {
    sources: BTreeMap<String, Source<V>>,
}

impl<V> Default for SourceRegistry<V> {
    fn default() -> Self {
        Self {
            sources: BTreeMap::new(),
        }
    }
}

impl<V> SourceRegistry<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source. Names must be unique.
    pub fn register(&mut self, source: Source<V>) -> Result<(), ConfigError> {
        if self.sources.contains_key(source.name()) {
            return Err(ConfigError::DuplicateSource(source.name().to_string()));
        }
        self.sources.insert(source.name().to_string(), source);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Source<V>> {
        self.sources.get(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source<V>> {
        self.sources.values()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

// == Build Sources ==
/// Creates the `dns` and `static` sources described by `config`.
pub fn build_sources(config: &Config) -> Result<SourceRegistry<String>, ConfigError> {
    let mut registry = SourceRegistry::new();
    registry.register(dns::create_source(&config.dns)?)?;
    registry.register(static_map::create_source(&config.static_source))?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::lookup_fn;
    use std::time::Duration;

    fn echo_source(name: &str, cache: &CacheConfig) -> Source<String> {
        Source::new(
            name,
            lookup_fn(|_ctx, key: String| async move { Ok(Some(key)) }),
            cache,
        )
    }

    #[tokio::test]
    async fn test_uncached_source() {
        let source = echo_source("echo", &CacheConfig::default());
        let ctx = LookupContext::new();

        assert_eq!(source.name(), "echo");
        assert_eq!(source.lookup(&ctx, "k").await, Ok(Some("k".to_string())));
        assert!(source.cache().is_none());
        assert!(source.stats().is_none());
        assert!(!source.clear_cache());
    }

    #[tokio::test]
    async fn test_cached_source_stats_and_clear() {
        let source = echo_source("echo", &CacheConfig::enabled(10, Duration::ZERO));
        let ctx = LookupContext::new();

        source.lookup(&ctx, "k").await.unwrap();
        source.lookup(&ctx, "k").await.unwrap();

        let stats = source.stats().unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.total_entries, 1);

        assert!(source.clear_cache());
        assert_eq!(source.stats().unwrap().total_entries, 0);
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut registry = SourceRegistry::new();
        registry
            .register(echo_source("a", &CacheConfig::default()))
            .unwrap();

        let result = registry.register(echo_source("a", &CacheConfig::default()));
        assert_eq!(result, Err(ConfigError::DuplicateSource("a".to_string())));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_names_sorted() {
        let mut registry = SourceRegistry::new();
        for name in ["static", "dns", "custom"] {
            registry
                .register(echo_source(name, &CacheConfig::default()))
                .unwrap();
        }

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["custom", "dns", "static"]);
        assert!(registry.get("dns").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[tokio::test]
    async fn test_build_sources_from_default_config() {
        let registry = build_sources(&Config::default()).unwrap();

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["dns", "static"]);
        assert!(registry.get("dns").unwrap().cache().is_some());
        assert!(registry.get("static").unwrap().cache().is_none());
    }

    #[tokio::test]
    async fn test_build_sources_rejects_bad_dns_server() {
        let mut config = Config::default();
        config.dns.server = Some("nameserver".to_string());

        assert!(matches!(
            build_sources(&config),
            Err(ConfigError::InvalidServer(_))
        ));
    }
}

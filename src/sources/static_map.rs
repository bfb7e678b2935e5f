//! Static Mapping Source
//!
//! Answers lookups from a fixed key/value table supplied by configuration.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::cache::CacheConfig;
use crate::error::{ConfigError, LookupError};
use crate::lookup::{Lookup, LookupContext};
use crate::sources::Source;

pub const SOURCE_TYPE: &str = "static";

// == Static Config ==
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticConfig {
    pub mappings: HashMap<String, String>,
    /// Disabled by default; the table is already in memory
    pub cache: CacheConfig,
}

/// Parses `key=value` pairs separated by commas. Blank segments are skipped.
///
/// Keys and values are trimmed; a later duplicate key wins.
pub fn parse_mappings(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut mappings = HashMap::new();
    for pair in raw.split(',').map(str::trim).filter(|pair| !pair.is_empty()) {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(ConfigError::InvalidMapping(pair.to_string()));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::InvalidMapping(pair.to_string()));
        }
        mappings.insert(key.to_string(), value.trim().to_string());
    }
    Ok(mappings)
}

// == Static Source ==
#[derive(Debug, Clone)]
pub struct StaticSource {
    mappings: HashMap<String, String>,
}

impl StaticSource {
    pub fn new(mappings: HashMap<String, String>) -> Self {
        Self { mappings }
    }
}

#[async_trait]
impl Lookup for StaticSource {
    type Value = String;

    async fn lookup(&self, ctx: &LookupContext, key: &str) -> Result<Option<String>, LookupError> {
        ctx.check()?;
        Ok(self.mappings.get(key).cloned())
    }
}

/// Builds the `static` source, cached per `config.cache`.
pub fn create_source(config: &StaticConfig) -> Source<String> {
    Source::new(
        SOURCE_TYPE,
        StaticSource::new(config.mappings.clone()),
        &config.cache,
    )
}

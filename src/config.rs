//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::error::ConfigError;
use crate::sources::dns::{DnsConfig, RecordType};
use crate::sources::static_map::{self, parse_mappings, StaticConfig};

/// Server configuration parameters.
///
/// Numeric and boolean variables that fail to parse fall back to their
/// defaults; a bad record type or mapping is an error. Call
/// [`validate`](Self::validate) before building sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// `dns` source settings
    pub dns: DnsConfig,
    /// `static` source settings
    pub static_source: StaticConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DNS_RECORD_TYPE` - Only `PTR` is supported (default: PTR)
    /// - `DNS_TIMEOUT_MS` - Per-query timeout (default: 5000)
    /// - `DNS_SERVER` - Nameserver `ip[:port]` (default: system resolver)
    /// - `DNS_CACHE_ENABLED` (default: true), `DNS_CACHE_SIZE` (default: 10000)
    /// - `DNS_CACHE_TTL_SECS` (default: 300), `DNS_CACHE_NEGATIVE_TTL_SECS` (default: 60)
    /// - `STATIC_MAPPINGS` - `key=value` pairs separated by commas (default: empty)
    /// - `STATIC_CACHE_ENABLED` (default: false), `STATIC_CACHE_SIZE` (default: 1000)
    /// - `STATIC_CACHE_TTL_SECS` (default: 0), `STATIC_CACHE_NEGATIVE_TTL_SECS` (default: 0)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let dns = DnsConfig {
            record_type: var("DNS_RECORD_TYPE")
                .map(|raw| raw.parse::<RecordType>())
                .transpose()?
                .unwrap_or(defaults.dns.record_type),
            timeout: Duration::from_millis(parse_or(
                var("DNS_TIMEOUT_MS"),
                defaults.dns.timeout.as_millis() as u64,
            )),
            server: var("DNS_SERVER")
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty()),
            cache: cache_from_vars(&var, "DNS", &defaults.dns.cache),
        };

        let static_source = StaticConfig {
            mappings: match var("STATIC_MAPPINGS") {
                Some(raw) => parse_mappings(&raw)?,
                None => defaults.static_source.mappings,
            },
            cache: cache_from_vars(&var, "STATIC", &defaults.static_source.cache),
        };

        Ok(Self {
            server_port: parse_or(var("SERVER_PORT"), defaults.server_port),
            dns,
            static_source,
        })
    }

    // == Validation ==
    /// Checks settings that parse but cannot be served.
    ///
    /// Rejects port 0, a malformed DNS server and enabled caches whose
    /// negative TTL outlives their positive TTL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        self.dns.validate()?;
        self.static_source.cache.validate(static_map::SOURCE_TYPE)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            dns: DnsConfig::default(),
            static_source: StaticConfig {
                mappings: Default::default(),
                cache: CacheConfig {
                    enabled: false,
                    size: 1000,
                    ttl: Duration::ZERO,
                    negative_ttl: Duration::ZERO,
                },
            },
        }
    }
}

fn cache_from_vars<F>(var: &F, prefix: &str, defaults: &CacheConfig) -> CacheConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |suffix: &str| var(&format!("{prefix}_CACHE_{suffix}"));
    CacheConfig {
        enabled: parse_or(get("ENABLED"), defaults.enabled),
        size: parse_or(get("SIZE"), defaults.size),
        ttl: Duration::from_secs(parse_or(get("TTL_SECS"), defaults.ttl.as_secs())),
        negative_ttl: Duration::from_secs(parse_or(
            get("NEGATIVE_TTL_SECS"),
            defaults.negative_ttl.as_secs(),
        )),
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

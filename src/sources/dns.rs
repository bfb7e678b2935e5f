//! DNS Lookup Source
//!
//! Reverse-resolves IP addresses to hostnames (PTR records). Answers are
//! cached by default since every miss is a network round trip.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::TokioAsyncResolver;
use tracing::{debug, warn};

use crate::cache::CacheConfig;
use crate::error::{ConfigError, LookupError};
use crate::lookup::{Lookup, LookupContext};
use crate::sources::Source;

pub const SOURCE_TYPE: &str = "dns";

/// Per-query timeout used when the configuration leaves it at zero.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Port assumed for a server given without one.
pub const DEFAULT_DNS_PORT: u16 = 53;

// == Record Type ==
/// Record type queried for each key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordType {
    /// Reverse lookup: IP address -> hostname
    #[default]
    Ptr,
}

impl FromStr for RecordType {
    type Err = ConfigError;

    /// Accepts `PTR` in any case; empty means `PTR`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "PTR" => Ok(RecordType::Ptr),
            _ => Err(ConfigError::InvalidRecordType(s.to_string())),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Ptr => f.write_str("PTR"),
        }
    }
}

// == DNS Config ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsConfig {
    pub record_type: RecordType,
    /// Per-query timeout, zero = [`DEFAULT_TIMEOUT`]
    pub timeout: Duration,
    /// Nameserver as `ip` or `ip:port`; None = system resolver configuration
    pub server: Option<String>,
    pub cache: CacheConfig,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            record_type: RecordType::Ptr,
            timeout: DEFAULT_TIMEOUT,
            server: None,
            cache: CacheConfig::enabled(10_000, Duration::from_secs(300))
                .with_negative_ttl(Duration::from_secs(60)),
        }
    }
}

impl DnsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(server) = &self.server {
            parse_server(server)?;
        }
        self.cache.validate(SOURCE_TYPE)
    }
}

/// Parses `ip` or `ip:port` (IPv6 with a port as `[addr]:port`).
pub fn parse_server(raw: &str) -> Result<SocketAddr, ConfigError> {
    let raw = raw.trim();
    raw.parse::<SocketAddr>()
        .or_else(|_| {
            raw.parse::<IpAddr>()
                .map(|ip| SocketAddr::new(ip, DEFAULT_DNS_PORT))
        })
        .map_err(|_| ConfigError::InvalidServer(raw.to_string()))
}

fn resolver_config(server: Option<&str>) -> Result<(ResolverConfig, ResolverOpts), ConfigError> {
    if let Some(server) = server {
        let addr = parse_server(server)?;
        let name_servers = NameServerConfigGroup::from_ips_clear(&[addr.ip()], addr.port(), true);
        return Ok((
            ResolverConfig::from_parts(None, vec![], name_servers),
            ResolverOpts::default(),
        ));
    }

    match hickory_resolver::system_conf::read_system_conf() {
        Ok(system) => Ok(system),
        Err(err) => {
            warn!(error = %err, "system resolver configuration unavailable, using defaults");
            Ok((ResolverConfig::default(), ResolverOpts::default()))
        }
    }
}

/// Strips the root label from a fully qualified name.
fn trim_root(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Maps resolver failures onto lookup outcomes.
///
/// Missing records and transient failures are "not found"; anything else
/// is a backend error.
fn classify(ip: IpAddr, err: ResolveError) -> Result<Option<String>, LookupError> {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { .. } => {
            debug!(%ip, "no PTR record");
            Ok(None)
        }
        ResolveErrorKind::Timeout | ResolveErrorKind::NoConnections | ResolveErrorKind::Io(_) => {
            debug!(%ip, error = %err, "transient resolver failure");
            Ok(None)
        }
        _ => Err(LookupError::Backend(err.to_string())),
    }
}

// == DNS Source ==
/// Resolves an IP address key to the first hostname of its PTR answer.
///
/// The returned name has its trailing dot removed.
pub struct DnsSource {
    record_type: RecordType,
    timeout: Duration,
    resolver: TokioAsyncResolver,
}

impl DnsSource {
    /// Builds the resolver; fails only on a malformed `server`.
    pub fn new(config: &DnsConfig) -> Result<Self, ConfigError> {
        let timeout = if config.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            config.timeout
        };

        let (resolver_config, mut opts) = resolver_config(config.server.as_deref())?;
        opts.timeout = timeout;

        Ok(Self {
            record_type: config.record_type,
            timeout,
            resolver: TokioAsyncResolver::tokio(resolver_config, opts),
        })
    }

    async fn lookup_ptr(&self, ip: IpAddr) -> Result<Option<String>, LookupError> {
        match self.resolver.reverse_lookup(ip).await {
            Ok(names) => Ok(names
                .iter()
                .next()
                .map(|name| trim_root(&name.to_string()).to_string())),
            Err(err) => classify(ip, err),
        }
    }
}

#[async_trait]
impl Lookup for DnsSource {
    type Value = String;

    async fn lookup(&self, ctx: &LookupContext, key: &str) -> Result<Option<String>, LookupError> {
        let ip: IpAddr = key
            .trim()
            .parse()
            .map_err(|_| LookupError::InvalidKey(format!("{key:?} is not an IP address")))?;

        let ctx = ctx.with_timeout(self.timeout);
        match self.record_type {
            RecordType::Ptr => ctx.run(self.lookup_ptr(ip)).await,
        }
    }
}

/// Builds the `dns` source, cached per `config.cache`.
pub fn create_source(config: &DnsConfig) -> Result<Source<String>, ConfigError> {
    Ok(Source::new(
        SOURCE_TYPE,
        DnsSource::new(config)?,
        &config.cache,
    ))
}

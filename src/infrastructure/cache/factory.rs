//! Cache factory for runtime selection

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::CacheSettings;
use crate::domain::cache::Cache;
use crate::domain::DomainError;

use super::in_memory::{InMemoryCache, InMemoryCacheConfig};
use super::noop::NoopCache;
use super::redis::{RedisCache, RedisCacheConfig};

const DEFAULT_REDIS_PORT: u16 = 6379;

/// Supported cache types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheType {
    /// Redis cache
    #[default]
    Redis,
    /// In-memory cache using moka
    InMemory,
    /// No caching; every read goes to the store
    Disabled,
}

impl std::fmt::Display for CacheType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheType::Redis => write!(f, "redis"),
            CacheType::InMemory => write!(f, "in_memory"),
            CacheType::Disabled => write!(f, "disabled"),
        }
    }
}

impl std::str::FromStr for CacheType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(CacheType::Redis),
            "in_memory" | "inmemory" | "memory" => Ok(CacheType::InMemory),
            "disabled" | "none" | "off" => Ok(CacheType::Disabled),
            _ => Err(DomainError::configuration(format!(
                "Unknown cache type: {}. Valid types: redis, in_memory, disabled",
                s
            ))),
        }
    }
}

/// Configuration for cache factory
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    /// Type of cache to create
    pub cache_type: CacheType,
    /// Full Redis URL; wins over host/port when set
    pub redis_url: Option<String>,
    /// Redis host, used when no URL is given
    pub redis_host: Option<String>,
    /// Redis port, defaults to 6379
    pub redis_port: Option<u16>,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
    /// Maximum capacity (for in-memory cache)
    pub max_capacity: Option<u64>,
    /// Snapshot lifetime; the in-memory backend must retain entries this long
    pub ttl: Option<Duration>,
    /// Per-command deadline for Redis
    pub response_timeout: Option<Duration>,
}

impl CacheConfig {
    /// Creates a new configuration for in-memory cache
    pub fn in_memory() -> Self {
        Self {
            cache_type: CacheType::InMemory,
            ..Default::default()
        }
    }

    /// Creates a new configuration for Redis cache
    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            cache_type: CacheType::Redis,
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Sets the Redis host and port
    pub fn with_redis_address(mut self, host: impl Into<String>, port: u16) -> Self {
        self.redis_host = Some(host.into());
        self.redis_port = Some(port);
        self
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Builds cache config from the application settings
    pub fn from_settings(settings: &CacheSettings) -> Result<Self, DomainError> {
        Ok(Self {
            cache_type: settings.backend.parse()?,
            redis_url: non_empty(settings.url.as_deref()),
            redis_host: non_empty(settings.host.as_deref()),
            redis_port: settings.port,
            key_prefix: non_empty(settings.key_prefix.as_deref()),
            max_capacity: settings.max_capacity,
            ttl: Some(snapshot_ttl(settings)),
            response_timeout: Some(Duration::from_millis(settings.response_timeout_ms)),
        })
    }

    /// Settings for the moka backend
    ///
    /// The default one-hour ceiling is raised when snapshots are configured to
    /// live longer, so entries are never evicted before their own expiry.
    pub fn in_memory_config(&self) -> InMemoryCacheConfig {
        let mut config = InMemoryCacheConfig::default();

        if let Some(capacity) = self.max_capacity {
            config = config.with_max_capacity(capacity);
        }
        if let Some(ttl) = self.ttl {
            let max_ttl = config.max_ttl.max(ttl);
            config = config.with_max_ttl(max_ttl);
        }

        config
    }

    /// Settings for the Redis backend
    pub fn redis_config(&self) -> Result<RedisCacheConfig, DomainError> {
        let mut config = RedisCacheConfig::new(self.resolve_redis_url()?);

        if let Some(prefix) = &self.key_prefix {
            config = config.with_key_prefix(prefix.clone());
        }
        if let Some(timeout) = self.response_timeout {
            config = config.with_response_timeout(timeout);
        }

        Ok(config)
    }

    /// Resolves the Redis address: an explicit URL wins over host + port
    pub fn resolve_redis_url(&self) -> Result<String, DomainError> {
        if let Some(url) = &self.redis_url {
            return Ok(url.clone());
        }

        match &self.redis_host {
            Some(host) => Ok(format!(
                "redis://{}:{}",
                host,
                self.redis_port.unwrap_or(DEFAULT_REDIS_PORT)
            )),
            None => Err(DomainError::configuration(
                "Redis cache requires either a URL or a host",
            )),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Factory for creating cache instances
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    /// Creates a new cache factory
    pub fn new() -> Self {
        Self
    }

    /// Creates a cache instance based on configuration
    pub async fn create(&self, config: &CacheConfig) -> Result<Arc<dyn Cache>, DomainError> {
        match config.cache_type {
            CacheType::InMemory => Ok(Arc::new(InMemoryCache::with_config(
                config.in_memory_config(),
            ))),
            CacheType::Redis => {
                let cache = RedisCache::new(config.redis_config()?).await?;
                Ok(Arc::new(cache))
            }
            CacheType::Disabled => Ok(Arc::new(NoopCache::new())),
        }
    }

    /// Creates the configured cache, falling back to a no-op cache on failure
    ///
    /// The cache is an optimization only; an unreachable cache server must not
    /// keep the service from starting.
    pub async fn create_or_noop(&self, config: &CacheConfig) -> Arc<dyn Cache> {
        match self.create(config).await {
            Ok(cache) => {
                info!(cache_type = %config.cache_type, "Cache initialized");
                cache
            }
            Err(e) => {
                warn!(
                    cache_type = %config.cache_type,
                    error = %e,
                    "Cache unavailable, continuing without caching"
                );
                Arc::new(NoopCache::new())
            }
        }
    }
}

/// TTL applied to every question snapshot
pub fn snapshot_ttl(settings: &CacheSettings) -> Duration {
    Duration::from_secs(settings.ttl_secs)
}

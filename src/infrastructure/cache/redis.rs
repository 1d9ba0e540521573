//! Redis cache implementation

use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::{debug, info};

use crate::domain::cache::Cache;
use crate::domain::DomainError;

/// Configuration for Redis cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
    /// Connection timeout
    pub connection_timeout: Duration,
    /// Upper bound on a single command round trip
    pub response_timeout: Duration,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: None,
            connection_timeout: Duration::from_secs(5),
            response_timeout: Duration::from_secs(3),
        }
    }
}

impl RedisCacheConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Sets the connection timeout
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Sets the per-command response timeout
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }
}

/// Redis cache implementation
///
/// Values are stored with `SET EX`; pattern deletion walks the keyspace
/// with `SCAN` rather than `KEYS`. Every command is bounded by
/// `response_timeout`, so a server that stops answering surfaces as a cache
/// error instead of a stalled request.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCache {
    /// Creates a new Redis cache connection
    pub async fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = tokio::time::timeout(
            config.connection_timeout,
            ConnectionManager::new(client),
        )
        .await
        .map_err(|_| {
            DomainError::cache(format!(
                "Timed out connecting to Redis after {:?}",
                config.connection_timeout
            ))
        })?
        .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        info!(url = %config.url, "Connected to Redis");

        Ok(Self { connection, config })
    }

    fn prefix_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }

    async fn run<T>(
        &self,
        action: String,
        command: impl Future<Output = redis::RedisResult<T>>,
    ) -> Result<T, DomainError> {
        match tokio::time::timeout(self.config.response_timeout, command).await {
            Ok(result) => result.map_err(|e| DomainError::cache(format!("Failed to {}: {}", action, e))),
            Err(_) => Err(DomainError::cache(format!(
                "Timed out after {:?} trying to {}",
                self.config.response_timeout, action
            ))),
        }
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get_raw(&self, key: &str) -> Result<String, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let result: Option<String> = self
            .run(format!("get key '{}'", key), conn.get(&prefixed_key))
            .await?;

        result.ok_or_else(|| DomainError::cache_miss(key))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let ttl_secs = ttl.as_secs().max(1);

        let _: () = self
            .run(format!("set key '{}'", key), conn.set_ex(&prefixed_key, value, ttl_secs))
            .await?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let deleted: i32 = self
            .run(format!("delete key '{}'", key), conn.del(&prefixed_key))
            .await?;

        Ok(deleted > 0)
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
        let prefixed_pattern = self.prefix_key(pattern);
        let mut conn = self.connection.clone();

        let mut cursor = 0u64;
        let mut total_deleted = 0usize;

        loop {
            let (new_cursor, keys): (u64, Vec<String>) = self
                .run(
                    format!("scan keys with pattern '{}'", pattern),
                    redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(&prefixed_pattern)
                        .arg("COUNT")
                        .arg(100)
                        .query_async(&mut conn),
                )
                .await?;

            if !keys.is_empty() {
                let deleted: i32 = self
                    .run("delete scanned keys".to_string(), conn.del(&keys))
                    .await?;
                total_deleted += deleted as usize;
            }

            cursor = new_cursor;

            if cursor == 0 {
                break;
            }
        }

        debug!(pattern = %pattern, deleted = total_deleted, "Deleted keys by pattern");

        Ok(total_deleted)
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let exists: bool = self
            .run(format!("check existence of key '{}'", key), conn.exists(&prefixed_key))
            .await?;

        Ok(exists)
    }

    /// Nothing to flush: `ConnectionManager` has no explicit close, and its
    /// socket is released when the last clone of this cache is dropped.
    async fn close(&self) -> Result<(), DomainError> {
        debug!("Redis connection will be released on drop");
        Ok(())
    }
}

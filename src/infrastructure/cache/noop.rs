//! Cache that stores nothing

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::cache::Cache;
use crate::domain::DomainError;

/// Null-object cache: every lookup misses and every write is dropped
///
/// Stands in when caching is disabled or the cache server could not be
/// reached at startup, so callers never branch on an absent cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

impl NoopCache {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Cache for NoopCache {
    async fn get_raw(&self, key: &str) -> Result<String, DomainError> {
        Err(DomainError::cache_miss(key))
    }

    async fn set_raw(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), DomainError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<bool, DomainError> {
        Ok(false)
    }

    async fn delete_pattern(&self, _pattern: &str) -> Result<usize, DomainError> {
        Ok(0)
    }

    async fn close(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::CacheExt;

    #[tokio::test]
    async fn test_always_misses() {
        let cache = NoopCache::new();

        cache.set("key", "value", Duration::from_secs(60)).await.unwrap();

        let err = cache.get::<String>("key").await.unwrap_err();
        assert!(err.is_cache_miss());
        assert!(!cache.exists("key").await.unwrap());
    }

    #[tokio::test]
    async fn test_deletes_succeed() {
        let cache = NoopCache::new();

        assert!(!cache.delete("key").await.unwrap());
        assert_eq!(cache.delete_pattern("*").await.unwrap(), 0);
    }

    #[test]
    fn test_close_is_repeatable() {
        let cache = NoopCache::new();

        tokio_test::assert_ok!(tokio_test::block_on(cache.close()));
        tokio_test::assert_ok!(tokio_test::block_on(cache.close()));
    }
}

//! Cache trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::DomainError;

/// Key/value cache holding serialized snapshots with expiration
///
/// This trait uses JSON strings internally to be dyn-compatible.
/// Use the helper methods for typed get/set operations.
///
/// A lookup of an absent or expired key fails with `DomainError::CacheMiss`;
/// any other error means the cache itself is unavailable.
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Gets a raw JSON value from the cache
    async fn get_raw(&self, key: &str) -> Result<String, DomainError>;

    /// Sets a raw JSON value with a TTL, overwriting any existing value
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;

    /// Deletes a value from the cache; returns whether the key existed
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Deletes every key matching a glob pattern; returns the count removed
    async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError>;

    /// Checks if a live key exists in the cache
    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        match self.get_raw(key).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_cache_miss() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Releases the connection
    async fn close(&self) -> Result<(), DomainError>;
}

/// Extension trait providing typed get/set operations
pub trait CacheExt: Cache {
    /// Gets a typed value from the cache
    fn get<'a, V>(
        &'a self,
        key: &'a str,
    ) -> impl std::future::Future<Output = Result<V, DomainError>> + Send
    where
        V: DeserializeOwned + Send,
    {
        async move {
            let data = self.get_raw(key).await?;

            serde_json::from_str(&data).map_err(|e| {
                DomainError::cache(format!("Failed to deserialize cache value: {}", e))
            })
        }
    }

    /// Sets a typed value in the cache with a TTL
    fn set<'a, V>(
        &'a self,
        key: &'a str,
        value: &'a V,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<(), DomainError>> + Send
    where
        V: Serialize + Send + Sync + ?Sized,
    {
        async move {
            let data = serde_json::to_string(value).map_err(|e| {
                DomainError::cache(format!("Failed to serialize cache value: {}", e))
            })?;
            self.set_raw(key, &data, ttl).await
        }
    }
}

// Blanket implementation for all types implementing Cache
impl<T: Cache + ?Sized> CacheExt for T {}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::domain::cache::glob_to_regex;

    /// Mock cache for testing
    ///
    /// Entries never expire; the recorded TTL can be inspected. An injected
    /// error makes every operation fail as an unreachable cache would.
    #[derive(Debug, Default)]
    pub struct MockCache {
        entries: Mutex<HashMap<String, (String, Duration)>>,
        error: Mutex<Option<String>>,
    }

    impl MockCache {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entry<V: Serialize>(self, key: &str, value: &V, ttl: Duration) -> Self {
            let json = serde_json::to_string(value).unwrap();
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (json, ttl));
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            self.fail(error);
            self
        }

        /// Start failing every operation
        pub fn fail(&self, error: impl Into<String>) {
            *self.error.lock().unwrap() = Some(error.into());
        }

        /// Stop failing
        pub fn recover(&self) {
            *self.error.lock().unwrap() = None;
        }

        pub fn contains(&self, key: &str) -> bool {
            self.entries.lock().unwrap().contains_key(key)
        }

        pub fn ttl_of(&self, key: &str) -> Option<Duration> {
            self.entries.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::cache(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Cache for MockCache {
        async fn get_raw(&self, key: &str) -> Result<String, DomainError> {
            self.check_error()?;
            let entries = self.entries.lock().unwrap();

            entries
                .get(key)
                .map(|(json, _)| json.clone())
                .ok_or_else(|| DomainError::cache_miss(key))
        }

        async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
            self.check_error()?;
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (value.to_string(), ttl));
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<bool, DomainError> {
            self.check_error()?;
            Ok(self.entries.lock().unwrap().remove(key).is_some())
        }

        async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
            self.check_error()?;
            let regex = glob_to_regex(pattern)?;

            let mut entries = self.entries.lock().unwrap();
            let before = entries.len();
            entries.retain(|k, _| !regex.is_match(k));

            Ok(before - entries.len())
        }

        async fn close(&self) -> Result<(), DomainError> {
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_cache_set_get() {
            let cache = MockCache::new();
            cache
                .set("key1", "value1", Duration::from_secs(60))
                .await
                .unwrap();

            let result: String = cache.get("key1").await.unwrap();
            assert_eq!(result, "value1");
        }

        #[tokio::test]
        async fn test_mock_cache_get_missing_is_miss() {
            let cache = MockCache::new();

            let err = cache.get::<String>("missing").await.unwrap_err();
            assert!(err.is_cache_miss());
        }

        #[tokio::test]
        async fn test_mock_cache_with_error() {
            let cache = MockCache::new().with_error("Test error");

            let err = cache.get::<String>("key").await.unwrap_err();
            assert!(!err.is_cache_miss());
        }

        #[tokio::test]
        async fn test_mock_cache_delete_pattern() {
            let cache = MockCache::new()
                .with_entry("question:1", &"a", Duration::from_secs(60))
                .with_entry("questions:all", &"b", Duration::from_secs(60))
                .with_entry("other:key", &"c", Duration::from_secs(60));

            let deleted = cache.delete_pattern("question*").await.unwrap();
            assert_eq!(deleted, 2);
            assert!(cache.contains("other:key"));
        }
    }
}

//! Question service - cache-aside orchestration over the question store

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::domain::cache::{Cache, CacheExt, QuestionCacheKey, QUESTION_KEYS_PATTERN};
use crate::domain::question::{Question, QuestionDraft, QuestionId, QuestionRepository};
use crate::domain::DomainError;

/// Default lifetime of a cached snapshot
pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(600);

/// Trait for question service (for dynamic dispatch in AppState)
#[async_trait]
pub trait QuestionServiceTrait: Send + Sync + Debug {
    /// List all questions, newest first
    async fn get_questions(&self) -> Result<Vec<Question>, DomainError>;

    /// Get one question by id
    async fn get_question(&self, id: QuestionId) -> Result<Question, DomainError>;

    /// Validate and insert a question
    async fn create_question(&self, draft: QuestionDraft) -> Result<Question, DomainError>;

    /// Replace every mutable field of a question
    async fn update_question(&self, id: QuestionId, draft: QuestionDraft)
        -> Result<(), DomainError>;

    /// Hard-delete a question
    async fn delete_question(&self, id: QuestionId) -> Result<(), DomainError>;

    /// Drop every cached question snapshot
    async fn purge_cache(&self) -> usize;

    /// Release the cache, then the store
    async fn shutdown(&self) -> Result<(), DomainError>;
}

/// Question service implementation
///
/// The store is the source of truth. Reads go through the cache; writes go
/// to the store and then invalidate the affected keys. Cache failures are
/// logged and absorbed, so only store errors reach the caller.
pub struct QuestionService<R: QuestionRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl<R: QuestionRepository + ?Sized> Debug for QuestionService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionService")
            .field("cache", &self.cache)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl<R: QuestionRepository + ?Sized> QuestionService<R> {
    /// Create a new question service
    pub fn new(repository: Arc<R>, cache: Arc<dyn Cache>) -> Self {
        Self {
            repository,
            cache,
            ttl: DEFAULT_SNAPSHOT_TTL,
        }
    }

    /// Set the snapshot TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Cached snapshot, or `None` on a miss or an unavailable cache
    async fn cached<V>(&self, key: &str) -> Option<V>
    where
        V: DeserializeOwned + Send,
    {
        match self.cache.get::<V>(key).await {
            Ok(value) => {
                debug!(cache_key = key, "Cache hit");
                Some(value)
            }
            Err(e) if e.is_cache_miss() => {
                debug!(cache_key = key, "Cache miss");
                None
            }
            Err(e) => {
                warn!(cache_key = key, error = %e, "Cache read failed, using store");
                None
            }
        }
    }

    async fn store<V>(&self, key: &str, value: &V)
    where
        V: serde::Serialize + Send + Sync + ?Sized,
    {
        match self.cache.set(key, value, self.ttl).await {
            Ok(()) => debug!(cache_key = key, ttl_secs = self.ttl.as_secs(), "Cached snapshot"),
            Err(e) => warn!(cache_key = key, error = %e, "Cache write failed"),
        }
    }

    async fn invalidate(&self, keys: &[QuestionCacheKey]) {
        for key in keys {
            let key = key.as_key();

            match self.cache.delete(&key).await {
                Ok(_) => debug!(cache_key = %key, "Invalidated snapshot"),
                Err(e) => warn!(cache_key = %key, error = %e, "Cache invalidation failed"),
            }
        }
    }
}

#[async_trait]
impl<R: QuestionRepository + ?Sized> QuestionServiceTrait for QuestionService<R> {
    #[instrument(skip(self))]
    async fn get_questions(&self) -> Result<Vec<Question>, DomainError> {
        let key = QuestionCacheKey::All.as_key();

        if let Some(questions) = self.cached::<Vec<Question>>(&key).await {
            return Ok(questions);
        }

        let questions = self.repository.list().await?;
        self.store(&key, &questions).await;

        Ok(questions)
    }

    #[instrument(skip_all, fields(question_id = %id))]
    async fn get_question(&self, id: QuestionId) -> Result<Question, DomainError> {
        let key = QuestionCacheKey::One(id).as_key();

        if let Some(question) = self.cached::<Question>(&key).await {
            return Ok(question);
        }

        let question = self.repository.get_by_id(id).await?;
        self.store(&key, &question).await;

        Ok(question)
    }

    #[instrument(skip(self, draft))]
    async fn create_question(&self, draft: QuestionDraft) -> Result<Question, DomainError> {
        draft
            .validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let question = self.repository.create(draft).await?;
        info!(question_id = %question.id(), "Created question");

        self.invalidate(&[QuestionCacheKey::All]).await;

        Ok(question)
    }

    #[instrument(skip_all, fields(question_id = %id))]
    async fn update_question(
        &self,
        id: QuestionId,
        draft: QuestionDraft,
    ) -> Result<(), DomainError> {
        draft
            .validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        self.repository.update(id, draft).await?;
        info!(question_id = %id, "Updated question");

        self.invalidate(&[QuestionCacheKey::All, QuestionCacheKey::One(id)])
            .await;

        Ok(())
    }

    #[instrument(skip_all, fields(question_id = %id))]
    async fn delete_question(&self, id: QuestionId) -> Result<(), DomainError> {
        self.repository.delete(id).await?;
        info!(question_id = %id, "Deleted question");

        self.invalidate(&[QuestionCacheKey::All, QuestionCacheKey::One(id)])
            .await;

        Ok(())
    }

    async fn purge_cache(&self) -> usize {
        match self.cache.delete_pattern(QUESTION_KEYS_PATTERN).await {
            Ok(removed) => {
                info!(removed, pattern = QUESTION_KEYS_PATTERN, "Purged cached questions");
                removed
            }
            Err(e) => {
                warn!(pattern = QUESTION_KEYS_PATTERN, error = %e, "Cache purge failed");
                0
            }
        }
    }

    async fn shutdown(&self) -> Result<(), DomainError> {
        if let Err(e) = self.cache.close().await {
            warn!(error = %e, "Failed to close cache");
        }

        self.repository.close().await?;
        info!("Question service shut down");

        Ok(())
    }
}

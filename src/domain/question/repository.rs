//! Question repository trait

use async_trait::async_trait;

use super::entity::{Question, QuestionDraft, QuestionId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Durable source of truth for questions
///
/// Implementations know nothing about caching.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Insert a new question, assigning its id and timestamps.
    ///
    /// Fails with `DuplicateTitle` when a question with the same title exists.
    /// The title check and the insert are separate statements, so two
    /// concurrent creates with one title can both succeed.
    async fn create(&self, draft: QuestionDraft) -> Result<Question, DomainError>;

    /// Replace title, answer and tags of an existing question
    async fn update(&self, id: QuestionId, draft: QuestionDraft) -> Result<(), DomainError>;

    /// Hard-delete a question
    async fn delete(&self, id: QuestionId) -> Result<(), DomainError>;

    /// Get a question by id, failing with `NotFound` if absent
    async fn get_by_id(&self, id: QuestionId) -> Result<Question, DomainError>;

    /// List all questions, most recently created first
    async fn list(&self) -> Result<Vec<Question>, DomainError>;

    /// Release the underlying connection; calling it again is a no-op
    async fn close(&self) -> Result<(), DomainError>;
}

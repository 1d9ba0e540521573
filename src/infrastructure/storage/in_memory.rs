//! In-memory question store

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::question::{Question, QuestionDraft, QuestionId, QuestionRepository};
use crate::domain::DomainError;

#[derive(Debug)]
struct State {
    questions: BTreeMap<QuestionId, Question>,
    next_id: i64,
}

/// Thread-safe in-memory question store
///
/// Useful for testing and development. Data is lost when the process terminates.
/// Ids start at 1 and are never reused after deletion.
#[derive(Debug)]
pub struct InMemoryQuestionRepository {
    state: RwLock<State>,
}

impl Default for InMemoryQuestionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryQuestionRepository {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                questions: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn not_found(id: QuestionId) -> DomainError {
        DomainError::not_found(format!("Question with id '{}' not found", id))
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn create(&self, draft: QuestionDraft) -> Result<Question, DomainError> {
        let mut state = self.state.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if state.questions.values().any(|q| q.title() == draft.title) {
            return Err(DomainError::duplicate_title(draft.title));
        }

        let id = QuestionId::new(state.next_id);
        state.next_id += 1;

        let now = Utc::now();
        let question = Question::new(id, draft.title, draft.answer, draft.tags, now, now);
        state.questions.insert(id, question.clone());

        Ok(question)
    }

    async fn update(&self, id: QuestionId, draft: QuestionDraft) -> Result<(), DomainError> {
        let mut state = self.state.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let question = state
            .questions
            .get_mut(&id)
            .ok_or_else(|| Self::not_found(id))?;

        question.apply(draft, Utc::now());
        Ok(())
    }

    async fn delete(&self, id: QuestionId) -> Result<(), DomainError> {
        let mut state = self.state.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        state
            .questions
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }

    async fn get_by_id(&self, id: QuestionId) -> Result<Question, DomainError> {
        let state = self.state.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        state
            .questions
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn list(&self) -> Result<Vec<Question>, DomainError> {
        let state = self.state.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut questions: Vec<Question> = state.questions.values().cloned().collect();
        questions.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });

        Ok(questions)
    }

    async fn close(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

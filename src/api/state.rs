//! Application state for shared services

use std::sync::Arc;

pub use crate::infrastructure::services::QuestionServiceTrait;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone, Debug)]
pub struct AppState {
    pub question_service: Arc<dyn QuestionServiceTrait>,
}

impl AppState {
    pub fn new(question_service: Arc<dyn QuestionServiceTrait>) -> Self {
        Self { question_service }
    }
}

//! Infrastructure services

mod question_service;

pub use question_service::{QuestionService, QuestionServiceTrait, DEFAULT_SNAPSHOT_TTL};

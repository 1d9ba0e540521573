//! Question domain
//!
//! The flashcard entity, its validation rules and the repository trait the
//! relational store implements.

mod entity;
mod repository;
mod validation;

pub use entity::{Question, QuestionDraft, QuestionId};
pub use repository::QuestionRepository;
pub use validation::{validate_title, QuestionValidationError};

#[cfg(test)]
pub use repository::MockQuestionRepository;

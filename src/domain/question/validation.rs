//! Question validation utilities

use thiserror::Error;

/// Errors that can occur during question validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuestionValidationError {
    #[error("Question title cannot be empty")]
    EmptyTitle,
}

/// Validate a question title
///
/// The title must contain at least one non-whitespace character. Answers and
/// tags carry no constraints.
pub fn validate_title(title: &str) -> Result<(), QuestionValidationError> {
    if title.trim().is_empty() {
        return Err(QuestionValidationError::EmptyTitle);
    }

    Ok(())
}

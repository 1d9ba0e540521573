//! Domain layer - Core business logic and entities

pub mod cache;
pub mod error;
pub mod question;

pub use cache::{Cache, CacheExt, QuestionCacheKey};
pub use error::DomainError;
pub use question::{Question, QuestionDraft, QuestionId, QuestionRepository};

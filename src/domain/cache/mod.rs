//! Cache domain - caching abstraction for question snapshots

mod key;
mod repository;

pub use key::{glob_to_regex, QuestionCacheKey, ALL_QUESTIONS_KEY, QUESTION_KEYS_PATTERN};
pub use repository::{Cache, CacheExt};

#[cfg(test)]
pub use repository::mock::MockCache;

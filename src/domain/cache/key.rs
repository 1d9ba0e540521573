//! Cache key scheme for question snapshots

use std::fmt;

use regex::Regex;

use crate::domain::question::QuestionId;
use crate::domain::DomainError;

/// Key holding the full question listing
pub const ALL_QUESTIONS_KEY: &str = "questions:all";

/// Glob matching every question snapshot, listing included
pub const QUESTION_KEYS_PATTERN: &str = "question*";

/// Keys under which question snapshots are cached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionCacheKey {
    /// `questions:all`
    All,
    /// `question:<id>`
    One(QuestionId),
}

impl QuestionCacheKey {
    pub fn as_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QuestionCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionCacheKey::All => f.write_str(ALL_QUESTIONS_KEY),
            QuestionCacheKey::One(id) => write!(f, "question:{}", id),
        }
    }
}

/// Compile a Redis-style glob (`*`, `?`) into an anchored regex
pub fn glob_to_regex(pattern: &str) -> Result<Regex, DomainError> {
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push('^');

    for c in pattern.chars() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }

    expr.push('$');

    Regex::new(&expr).map_err(|e| DomainError::cache(format!("Invalid pattern: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(QuestionCacheKey::All.as_key(), "questions:all");
        assert_eq!(QuestionCacheKey::One(QuestionId::new(5)).as_key(), "question:5");
    }

    #[test]
    fn test_glob_matches_question_keys() {
        let regex = glob_to_regex(QUESTION_KEYS_PATTERN).unwrap();

        assert!(regex.is_match("questions:all"));
        assert!(regex.is_match("question:12"));
        assert!(!regex.is_match("user:1"));
        assert!(!regex.is_match("myapp:question:1"));
    }

    #[test]
    fn test_glob_escapes_regex_metacharacters() {
        let regex = glob_to_regex("user.?:*").unwrap();

        assert!(regex.is_match("user.1:profile"));
        assert!(!regex.is_match("userx1:profile"));
    }
}

//! Question entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_title, QuestionValidationError};

/// Store-assigned question identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(i64);

impl QuestionId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for QuestionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mutable fields of a question, as supplied by a caller on create or update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub title: String,
    pub answer: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl QuestionDraft {
    pub fn new(title: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            answer: answer.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), QuestionValidationError> {
        validate_title(&self.title)
    }
}

/// A stored flashcard: question title, free-form answer and tags
///
/// Values of this type are always snapshots of a persisted row; the id and
/// both timestamps come from the relational store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    id: QuestionId,
    title: String,
    answer: String,
    #[serde(default)]
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Question {
    /// Rebuild a question from persisted state
    pub fn new(
        id: QuestionId,
        title: impl Into<String>,
        answer: impl Into<String>,
        tags: Vec<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            answer: answer.into(),
            tags,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> QuestionId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace every mutable field and bump `updated_at`
    pub fn apply(&mut self, draft: QuestionDraft, updated_at: DateTime<Utc>) {
        self.title = draft.title;
        self.answer = draft.answer;
        self.tags = draft.tags;
        self.updated_at = updated_at.max(self.created_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(tags: Vec<String>) -> Question {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Question::new(
            QuestionId::new(7),
            "What is ownership?",
            "Each value has a single owner.",
            tags,
            created,
            created,
        )
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(sample(vec!["rust".to_string()])).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "What is ownership?");
        assert_eq!(json["tags"], serde_json::json!(["rust"]));
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_empty_tags_survive_round_trip() {
        let question = sample(Vec::new());
        let encoded = serde_json::to_string(&question).unwrap();

        assert!(encoded.contains("\"tags\":[]"));

        let decoded: Question = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, question);
        assert!(decoded.tags().is_empty());
    }

    #[test]
    fn test_missing_tags_decode_as_empty() {
        let json = r#"{
            "id": 1,
            "title": "t",
            "answer": "a",
            "createdAt": "2024-03-01T12:00:00Z",
            "updatedAt": "2024-03-01T12:00:00Z"
        }"#;

        let question: Question = serde_json::from_str(json).unwrap();
        assert!(question.tags().is_empty());
    }

    #[test]
    fn test_apply_keeps_id_and_created_at() {
        let mut question = sample(vec!["a".to_string()]);
        let later = question.created_at() + chrono::Duration::minutes(5);

        question.apply(
            QuestionDraft::new("New title", "New answer").with_tags(["b", "b"]),
            later,
        );

        assert_eq!(question.id(), QuestionId::new(7));
        assert_eq!(question.title(), "New title");
        assert_eq!(question.tags(), &["b".to_string(), "b".to_string()]);
        assert_eq!(question.updated_at(), later);
        assert!(question.updated_at() >= question.created_at());
    }

    #[test]
    fn test_draft_tags_default_to_empty() {
        let draft: QuestionDraft = serde_json::from_str(r#"{"title":"t","answer":"a"}"#).unwrap();
        assert!(draft.tags.is_empty());
    }
}

//! Question endpoint handlers

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::question::{Question, QuestionDraft, QuestionId};

/// Body of a successful delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

fn parse_id(raw: &str) -> Result<QuestionId, ApiError> {
    raw.parse::<i64>()
        .map(QuestionId::new)
        .map_err(|_| {
            ApiError::bad_request(format!("Invalid question id '{}'", raw))
                .with_param("id")
                .with_code("invalid_id")
        })
}

/// GET /api/v1/questions
pub async fn list_questions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Question>>, ApiError> {
    debug!("Listing questions");

    let questions = state.question_service.get_questions().await?;
    Ok(Json(questions))
}

/// GET /api/v1/questions/{id}
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Question>, ApiError> {
    let id = parse_id(&id)?;
    debug!(question_id = %id, "Getting question");

    let question = state.question_service.get_question(id).await?;
    Ok(Json(question))
}

/// POST /api/v1/questions
pub async fn create_question(
    State(state): State<AppState>,
    Json(draft): Json<QuestionDraft>,
) -> Result<Json<Question>, ApiError> {
    debug!("Creating question");

    let question = state.question_service.create_question(draft).await?;
    Ok(Json(question))
}

/// PUT /api/v1/questions/{id}
///
/// Responds with the record as re-read after the update.
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<QuestionDraft>,
) -> Result<Json<Question>, ApiError> {
    let id = parse_id(&id)?;
    debug!(question_id = %id, "Updating question");

    state.question_service.update_question(id, draft).await?;
    let question = state.question_service.get_question(id).await?;

    Ok(Json(question))
}

/// DELETE /api/v1/questions/{id}
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    debug!(question_id = %id, "Deleting question");

    state.question_service.delete_question(id).await?;

    Ok(Json(MessageResponse {
        message: "Question deleted".to_string(),
    }))
}

//! JSON body extractor for question payloads
//!
//! Body rejections are reported in the same `{"error": ...}` envelope as every
//! other API failure, with `param` naming the offending field when serde tells
//! us which one it was.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::{de::DeserializeOwned, Serialize};

use super::error::{ApiError, ApiErrorType};

/// `axum::Json` with rejections converted into [`ApiError`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let AxumJson(value) = AxumJson::<T>::from_request(req, state).await?;
        Ok(Json(value))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        let invalid = |message: String| ApiError::new(status, ApiErrorType::InvalidRequestError, message);

        match &rejection {
            JsonRejection::JsonDataError(err) => {
                let detail = err.body_text();
                match missing_field(&detail) {
                    Some(field) => invalid(format!("Question body is missing required field '{}'", field))
                        .with_param(field)
                        .with_code("missing_field"),
                    None => invalid(format!("Invalid question body: {}", detail)).with_code("invalid_body"),
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                invalid(format!("Invalid JSON syntax: {}", err.body_text())).with_code("json_parse_error")
            }
            JsonRejection::MissingJsonContentType(_) => {
                invalid("Expected a request body with Content-Type 'application/json'".to_string())
                    .with_code("missing_content_type")
            }
            JsonRejection::BytesRejection(err) => {
                invalid(format!("Failed to read request body: {}", err.body_text())).with_code("unreadable_body")
            }
            _ => invalid("Invalid JSON request".to_string()).with_code("invalid_body"),
        }
    }
}

/// Field name out of serde's "missing field `name`" message
fn missing_field(detail: &str) -> Option<&str> {
    let start = detail.find("missing field `")? + "missing field `".len();
    let len = detail[start..].find('`')?;
    Some(&detail[start..start + len])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;

    use crate::domain::question::QuestionDraft;

    async fn extract(content_type: Option<&str>, body: &str) -> Result<QuestionDraft, ApiError> {
        let mut builder = axum::http::Request::builder().method("POST");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();

        Json::<QuestionDraft>::from_request(request, &())
            .await
            .map(|Json(draft)| draft)
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let draft = extract(Some("application/json"), r#"{"title":"What is Pin?","answer":"A pointer wrapper"}"#)
            .await
            .unwrap();

        assert_eq!(draft.title, "What is Pin?");
        assert!(draft.tags.is_empty());
    }

    #[tokio::test]
    async fn test_missing_title_names_the_field() {
        let err = extract(Some("application/json"), r#"{"answer":"a"}"#).await.unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.response.error.param.as_deref(), Some("title"));
        assert_eq!(err.response.error.code.as_deref(), Some("missing_field"));
        assert_eq!(
            err.response.error.message,
            "Question body is missing required field 'title'"
        );
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_invalid_body() {
        let err = extract(Some("application/json"), r#"{"title":"t","answer":"a","tags":"rust"}"#)
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.response.error.code.as_deref(), Some("invalid_body"));
        assert!(err.response.error.message.starts_with("Invalid question body"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let err = extract(Some("application/json"), r#"{"title":"#).await.unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.code.as_deref(), Some("json_parse_error"));
        assert!(err.response.error.message.starts_with("Invalid JSON syntax"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_rejected() {
        let err = extract(None, r#"{"title":"t","answer":"a"}"#).await.unwrap_err();

        assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(err.response.error.code.as_deref(), Some("missing_content_type"));
    }

    #[test]
    fn test_missing_field_parsing() {
        assert_eq!(
            missing_field("Failed to deserialize the JSON body into the target type: missing field `answer` at line 1 column 15"),
            Some("answer")
        );
        assert_eq!(missing_field("invalid type: string \"rust\", expected a sequence"), None);
    }
}

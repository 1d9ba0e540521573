use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::health;
use super::state::AppState;
use super::v1;

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create a minimal router without state (health endpoint only)
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .layer(TraceLayer::new_for_http())
}

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", v1::create_v1_router())
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::cache::MockCache;
    use crate::infrastructure::cache::InMemoryCache;
    use crate::infrastructure::services::QuestionService;
    use crate::infrastructure::storage::InMemoryQuestionRepository;

    fn app() -> Router {
        let service = QuestionService::new(
            Arc::new(InMemoryQuestionRepository::new()),
            Arc::new(InMemoryCache::new()),
        );

        create_router_with_state(AppState::new(Arc::new(service)))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = create_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_question_lifecycle() {
        let app = app();

        let response = send(&app, "GET", "/api/v1/questions", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));

        let response = send(
            &app,
            "POST",
            "/api/v1/questions",
            Some(json!({"title": "What is Send?", "answer": "Safe to move across threads", "tags": ["rust"]})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let created = body_json(response).await;
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["tags"], json!(["rust"]));
        assert!(created["createdAt"].is_string());
        assert!(created["updatedAt"].is_string());

        let response = send(&app, "GET", &format!("/api/v1/questions/{}", id), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, created);

        let response = send(
            &app,
            "PUT",
            &format!("/api/v1/questions/{}", id),
            Some(json!({"title": "What is Sync?", "answer": "Safe to share references"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let updated = body_json(response).await;
        assert_eq!(updated["id"], id);
        assert_eq!(updated["title"], "What is Sync?");
        assert_eq!(updated["tags"], json!([]));
        assert_eq!(updated["createdAt"], created["createdAt"]);

        let response = send(&app, "GET", "/api/v1/questions", None).await;
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["title"], "What is Sync?");

        let response = send(&app, "DELETE", &format!("/api/v1/questions/{}", id), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"message": "Question deleted"}));

        let response = send(&app, "GET", &format!("/api/v1/questions/{}", id), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["type"], "not_found_error");
    }

    #[tokio::test]
    async fn test_duplicate_title_is_conflict() {
        let app = app();
        let body = json!({"title": "Same", "answer": "a"});

        let first = send(&app, "POST", "/api/v1/questions", Some(body.clone())).await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = send(&app, "POST", "/api/v1/questions", Some(body)).await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(second).await["error"]["code"], "duplicate_title");
    }

    #[tokio::test]
    async fn test_blank_title_is_bad_request() {
        let app = app();

        let response = send(
            &app,
            "POST",
            "/api/v1/questions",
            Some(json!({"title": "  ", "answer": "a"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = app();

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/questions")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "json_parse_error"
        );
    }

    #[tokio::test]
    async fn test_missing_title_names_the_field() {
        let app = app();

        let response = send(&app, "POST", "/api/v1/questions", Some(json!({"answer": "a"}))).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["param"], "title");
        assert_eq!(body["error"]["code"], "missing_field");
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_invalid_id_is_bad_request() {
        let app = app();

        let response = send(&app, "GET", "/api/v1/questions/abc", None).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["param"], "id");
    }

    #[tokio::test]
    async fn test_missing_question_mutations_are_not_found() {
        let app = app();

        let response = send(
            &app,
            "PUT",
            "/api/v1/questions/9999",
            Some(json!({"title": "x", "answer": "y"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, "DELETE", "/api/v1/questions/9999", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cache_outage_does_not_fail_requests() {
        let cache = Arc::new(MockCache::new().with_error("connection refused"));
        let service = QuestionService::new(Arc::new(InMemoryQuestionRepository::new()), cache);
        let app = create_router_with_state(AppState::new(Arc::new(service)));

        let response = send(
            &app,
            "POST",
            "/api/v1/questions",
            Some(json!({"title": "Still works", "answer": "yes"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, "GET", "/api/v1/questions", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
    }
}

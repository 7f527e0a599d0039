//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/chat/stream", post(handlers::chat::stream_chat))
        .route("/chat/title", post(handlers::title::generate_chat_title))
        .route("/health", get(handlers::health::health_check));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use sakai_core::llm::box_provider::BoxGenerativeModel;
    use sakai_core::llm::provider::GenerativeModel;
    use sakai_core::llm::session::StreamSession;
    use sakai_types::config::GlobalConfig;
    use sakai_types::llm::{GenerateRequest, GenerateResponse, LlmError};

    struct EchoModel;

    impl GenerativeModel for EchoModel {
        fn name(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-model"
        }

        fn generate(
            &self,
            _request: &GenerateRequest,
        ) -> impl Future<Output = Result<GenerateResponse, LlmError>> + Send {
            async { Ok(GenerateResponse::from_text("Recette de crêpes")) }
        }

        fn stream_generate(
            &self,
            _request: GenerateRequest,
        ) -> impl Future<Output = Result<StreamSession, LlmError>> + Send {
            async {
                let partials = futures_util::stream::iter(vec![
                    Ok(GenerateResponse::from_text("Bon")),
                    Ok(GenerateResponse::from_text("jour")),
                ]);
                Ok(StreamSession::aggregated(partials))
            }
        }
    }

    fn router() -> Router {
        build_router(AppState::new(
            BoxGenerativeModel::new(EchoModel),
            GlobalConfig::default(),
        ))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_chat_stream_emits_chunks_then_done() {
        let body = r#"{"history":[{"role":"user","parts":[{"type":"text","text":"Salut"}]}]}"#;
        let response = router()
            .oneshot(post_json("/api/v1/chat/stream", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/event-stream")
        );

        let text = body_text(response).await;
        let first = text.find(r#"data: {"text":"Bon"}"#).unwrap();
        let second = text.find(r#"data: {"text":"jour"}"#).unwrap();
        let done = text.find("event: done").unwrap();
        assert!(first < second && second < done);
        assert_eq!(text.matches("event: chunk").count(), 2);
    }

    #[tokio::test]
    async fn test_chat_stream_empty_history_is_error_chunk() {
        let response = router()
            .oneshot(post_json("/api/v1/chat/stream", r#"{"history":[]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert_eq!(text.matches("event: chunk").count(), 1);
        assert!(text.contains(r#"data: {"error":"#));
        assert!(text.contains("event: done"));
    }

    #[tokio::test]
    async fn test_chat_stream_rejects_malformed_body() {
        let response = router()
            .oneshot(post_json("/api/v1/chat/stream", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["errors"][0]["code"], "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_title_endpoint() {
        let body = r#"{"userMessage":"Comment faire des crêpes ?","modelMessage":"Voici..."}"#;
        let response = router()
            .oneshot(post_json("/api/v1/chat/title", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["title"], "Recette de crêpes");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["model"], "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/bots")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

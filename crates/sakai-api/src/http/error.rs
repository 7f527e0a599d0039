//! Application error type mapping to HTTP status codes and envelope format.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use axum::response::{IntoResponse, Response};

use super::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
///
/// Failures that happen after a stream has started never reach this type;
/// they travel inside the stream as error chunks.
#[derive(Debug)]
pub enum AppError {
    /// The request body could not be read as the expected JSON.
    InvalidBody(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, &str) {
        match self {
            AppError::InvalidBody(msg) => (StatusCode::BAD_REQUEST, "INVALID_BODY", msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        tracing::debug!(code, detail = message, "request rejected");

        (
            status,
            Json(ApiResponse::<()>::error(code, message.to_string())),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_body_is_bad_request_envelope() {
        let response = AppError::InvalidBody("EOF while parsing".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["errors"][0]["code"], "INVALID_BODY");
        assert_eq!(json["errors"][0]["message"], "EOF while parsing");
    }
}

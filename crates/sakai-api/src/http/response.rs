//! Envelope format for API error responses.
//!
//! ```json
//! {
//!   "data": null,
//!   "meta": { "request_id": "...", "timestamp": "...", "response_time_ms": 0 },
//!   "errors": [{ "code": "...", "message": "..." }]
//! }
//! ```
//!
//! Successful chat and title responses keep their own minimal shapes so
//! browser clients can read them without unwrapping.

use serde::Serialize;

/// Envelope wrapping an API payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub meta: ApiMeta,
    pub errors: Vec<ApiErrorDetail>,
}

/// Metadata included in every envelope.
#[derive(Debug, Serialize)]
pub struct ApiMeta {
    /// Unique request identifier for tracing.
    pub request_id: String,
    /// ISO-8601 timestamp of the response.
    pub timestamp: String,
    pub response_time_ms: u64,
}

/// Individual error detail.
#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    pub message: String,
}

impl ApiMeta {
    fn now() -> Self {
        Self {
            request_id: uuid::Uuid::now_v7().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            response_time_ms: 0,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success envelope.
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            meta: ApiMeta::now(),
            errors: Vec::new(),
        }
    }
}

impl ApiResponse<()> {
    /// Create an error envelope with a single error.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            data: None,
            meta: ApiMeta::now(),
            errors: vec![ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::<()>::error("INVALID_BODY", "oups")).unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["errors"][0]["code"], "INVALID_BODY");
        assert_eq!(json["errors"][0]["message"], "oups");
        assert!(json["meta"]["request_id"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[test]
    fn test_success_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::success(serde_json::json!({"ok": true})))
            .unwrap();
        assert_eq!(json["data"]["ok"], true);
        assert_eq!(json["errors"].as_array().map(Vec::len), Some(0));
    }
}

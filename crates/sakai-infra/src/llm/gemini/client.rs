//! GeminiProvider -- concrete [`GenerativeModel`] for the Gemini REST API.
//!
//! Sends requests to `/v1beta/models/{model}:generateContent` and
//! `:streamGenerateContent?alt=sse`, authenticating with the
//! `x-goog-api-key` header.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use tracing::info_span;

use sakai_core::llm::provider::GenerativeModel;
use sakai_core::llm::session::StreamSession;
use sakai_types::llm::{GenerateRequest, GenerateResponse, LlmError};

use super::streaming::{SpannedStream, sse_partials};
use super::types::{GeminiErrorEnvelope, GeminiRequest, GeminiResponse};

/// Public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini provider.
///
/// No `Debug` derive: the struct holds the API key.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Long generations can take minutes.
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

    /// Create a provider for `model`.
    pub fn new(api_key: SecretString, model: impl Into<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(LlmError::transport)?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
        })
    }

    /// Override the base URL (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, method: &str) -> String {
        format!("{}/v1beta/models/{}:{method}", self.base_url, self.model)
    }

    /// POST `body` to `method` and return the response once its status is OK.
    async fn post(
        &self,
        method: &str,
        query: &[(&str, &str)],
        body: &GeminiRequest,
    ) -> Result<reqwest::Response, LlmError> {
        let response = self
            .client
            .post(self.url(method))
            .query(query)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(LlmError::transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after_ms = retry_after_ms(response.headers());
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, retry_after_ms, &body))
    }
}

impl GenerativeModel for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[tracing::instrument(
        name = "gemini.generate",
        skip_all,
        fields(gen_ai.request.model = %self.model, gen_ai.request.stream = false)
    )]
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let body = GeminiRequest::from(request);
        let response = self.post("generateContent", &[], &body).await?;

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;
        Ok(parsed.into())
    }

    #[tracing::instrument(
        name = "gemini.stream_open",
        skip_all,
        fields(gen_ai.request.model = %self.model, gen_ai.request.stream = true)
    )]
    async fn stream_generate(&self, request: GenerateRequest) -> Result<StreamSession, LlmError> {
        let body = GeminiRequest::from(&request);
        let response = self
            .post("streamGenerateContent", &[("alt", "sse")], &body)
            .await?;

        let span = info_span!("gemini.stream", gen_ai.request.model = %self.model);
        Ok(StreamSession::aggregated(SpannedStream::new(
            sse_partials(response),
            span,
        )))
    }
}

/// `Retry-After` in milliseconds, when given in seconds.
fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

/// Map a non-success status and its body to an [`LlmError`].
pub fn status_error(status: StatusCode, retry_after_ms: Option<u64>, body: &str) -> LlmError {
    let message = serde_json::from_str::<GeminiErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited { retry_after_ms },
        500.. => LlmError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
        code => LlmError::Http {
            status: code,
            message,
        },
    }
}

//! SSE stream adapter for `streamGenerateContent?alt=sse`.
//!
//! Each `data:` line carries one complete `GenerateContentResponse` JSON
//! object. A mid-stream failure arrives as a `{"error": {...}}` payload and
//! ends the stream.

use std::pin::Pin;
use std::task::{Context, Poll};

use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt};
use pin_project_lite::pin_project;

use sakai_types::llm::{GenerateResponse, LlmError};

use super::types::{GeminiErrorEnvelope, GeminiResponse};

/// Turn an accepted streaming HTTP response into partial responses.
pub fn sse_partials(
    response: reqwest::Response,
) -> impl Stream<Item = Result<GenerateResponse, LlmError>> + Send + 'static {
    async_stream::try_stream! {
        let mut events = response.bytes_stream().eventsource();

        while let Some(event) = events.next().await {
            let event = event.map_err(|e| LlmError::Stream(format!("SSE error: {e}")))?;
            if let Some(partial) = parse_event_data(&event.data)? {
                tracing::trace!(candidates = partial.candidates.len(), "gemini partial");
                yield partial;
            }
        }
    }
}

/// Parse one SSE `data` payload. Blank payloads are skipped.
pub fn parse_event_data(data: &str) -> Result<Option<GenerateResponse>, LlmError> {
    let data = data.trim();
    if data.is_empty() {
        return Ok(None);
    }

    if let Ok(envelope) = serde_json::from_str::<GeminiErrorEnvelope>(data) {
        return Err(LlmError::Provider {
            message: envelope.error.message,
        });
    }

    let response: GeminiResponse = serde_json::from_str(data)
        .map_err(|e| LlmError::Deserialization(format!("invalid stream event: {e}")))?;
    Ok(Some(response.into()))
}

pin_project! {
    /// Keeps a tracing span entered while the inner stream is polled, so
    /// events logged during streaming stay attached to the call's span.
    pub struct SpannedStream<S> {
        #[pin]
        inner: S,
        span: tracing::Span,
    }
}

impl<S> SpannedStream<S> {
    pub fn new(inner: S, span: tracing::Span) -> Self {
        Self { inner, span }
    }
}

impl<S: Stream> Stream for SpannedStream<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let _enter = this.span.enter();
        this.inner.poll_next(cx)
    }
}

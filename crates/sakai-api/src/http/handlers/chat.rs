//! SSE streaming chat handler.
//!
//! POST /api/v1/chat/stream
//!
//! Relays the request through [`ChatRelay`](sakai_core::chat::ChatRelay) and
//! forwards every chunk as one `chunk` event whose data is the chunk's JSON
//! (`{"text": ...}` or `{"error": ...}`). A final `done` event closes the
//! stream.

use std::convert::Infallible;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::{Stream, StreamExt};
use tracing::info_span;

use sakai_core::chat::failure::GENERIC_FAILURE_MESSAGE;
use sakai_core::llm::provider::GenerativeModel;
use sakai_observe::genai_attrs::{
    GEN_AI_OPERATION_NAME, GEN_AI_PROVIDER_NAME, GEN_AI_REQUEST_MESSAGE_COUNT,
    GEN_AI_REQUEST_MODEL, GEN_AI_REQUEST_TEMPERATURE, OP_CHAT, span_name,
};
use sakai_types::chat::{ChatRequest, StreamChunk};

use crate::http::error::AppError;
use crate::state::AppState;

/// SSE event name carrying one chunk.
pub const CHUNK_EVENT: &str = "chunk";

/// SSE event name marking the end of the stream.
pub const DONE_EVENT: &str = "done";

/// POST /api/v1/chat/stream
///
/// Only a malformed body is rejected up front. Every other failure,
/// including an empty history, arrives as an error chunk. Requests without
/// a temperature use the configured one.
pub async fn stream_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let Json(mut request) = body?;
    request.temperature = request.temperature.or(Some(state.config.temperature));

    let model = state.relay.model();
    let span = info_span!(
        "chat_stream",
        otel.name = %span_name(OP_CHAT, model.model()),
        { GEN_AI_OPERATION_NAME } = OP_CHAT,
        { GEN_AI_PROVIDER_NAME } = model.name(),
        { GEN_AI_REQUEST_MODEL } = model.model(),
        { GEN_AI_REQUEST_TEMPERATURE } = request.effective_temperature(),
        { GEN_AI_REQUEST_MESSAGE_COUNT } = request.history.len(),
    );
    let chunks = span.in_scope(|| {
        tracing::info!(
            personality = request.personality.as_deref().unwrap_or("default"),
            has_memory = request.memory.is_some(),
            has_override = request.override_system_prompt.is_some(),
            "chat stream requested"
        );
        state.relay.stream_chat(&request)
    });

    let events = chunks
        .map(|chunk| Ok::<_, Infallible>(chunk_event(&chunk)))
        .chain(tokio_stream::once(Ok(Event::default().event(DONE_EVENT).data("{}"))));

    Ok(Sse::new(events).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}

/// Encode one chunk as a `chunk` event.
fn chunk_event(chunk: &StreamChunk) -> Event {
    Event::default()
        .event(CHUNK_EVENT)
        .json_data(chunk)
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to encode chunk");
            Event::default()
                .event(CHUNK_EVENT)
                .data(serde_json::json!({ "error": GENERIC_FAILURE_MESSAGE }).to_string())
        })
}

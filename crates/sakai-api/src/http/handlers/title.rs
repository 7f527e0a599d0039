//! Conversation title handler.
//!
//! POST /api/v1/chat/title

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use tracing::{Instrument, info_span};

use sakai_core::chat::title::generate_title;
use sakai_core::llm::provider::GenerativeModel;
use sakai_observe::genai_attrs::{
    GEN_AI_OPERATION_NAME, GEN_AI_PROVIDER_NAME, GEN_AI_REQUEST_MODEL, OP_GENERATE_TITLE,
    span_name,
};

use crate::http::error::AppError;
use crate::state::AppState;

/// First exchange of a conversation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleRequest {
    pub user_message: String,
    #[serde(default)]
    pub model_message: String,
}

#[derive(Debug, Serialize)]
pub struct TitleResponse {
    pub title: String,
}

/// POST /api/v1/chat/title
///
/// Always answers with a title; upstream failures yield the default one.
pub async fn generate_chat_title(
    State(state): State<AppState>,
    body: Result<Json<TitleRequest>, JsonRejection>,
) -> Result<Json<TitleResponse>, AppError> {
    let Json(body) = body?;
    let model = state.model.as_ref();
    let span = info_span!(
        "chat_title",
        otel.name = %span_name(OP_GENERATE_TITLE, model.model()),
        { GEN_AI_OPERATION_NAME } = OP_GENERATE_TITLE,
        { GEN_AI_PROVIDER_NAME } = model.name(),
        { GEN_AI_REQUEST_MODEL } = model.model(),
    );
    let title = generate_title(model, &body.user_message, &body.model_message)
        .instrument(span)
        .await;
    Ok(Json(TitleResponse { title }))
}

//! OpenTelemetry GenAI Semantic Convention attribute constants.
//!
//! Usable as span field names with tracing's constant-name syntax, e.g.
//! `info_span!("chat", { GEN_AI_OPERATION_NAME } = OP_CHAT)`.
//!
//! Span naming convention: `"{operation} {model}"` (e.g., `"chat gemini-2.0-flash"`)

// --- Required attributes ---

/// The name of the operation being performed (e.g., "chat").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g., "gemini").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

// --- Recommended attributes ---

/// The model ID requested (e.g., "gemini-2.0-flash").
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

/// The sampling temperature for the request.
pub const GEN_AI_REQUEST_TEMPERATURE: &str = "gen_ai.request.temperature";

/// The number of messages in the conversation sent upstream.
pub const GEN_AI_REQUEST_MESSAGE_COUNT: &str = "gen_ai.request.message_count";

// --- Operation name values ---

/// Streaming chat reply.
pub const OP_CHAT: &str = "chat";

/// Auto-title generation for a conversation.
pub const OP_GENERATE_TITLE: &str = "generate_title";

/// Span name for an operation on a model.
pub fn span_name(operation: &str, model: &str) -> String {
    format!("{operation} {model}")
}

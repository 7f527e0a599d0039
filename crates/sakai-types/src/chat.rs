//! Chat request and stream chunk types.
//!
//! [`ChatRequest`] is the inbound call contract used by the HTTP endpoint and
//! the terminal chat. [`StreamChunk`] is the unit the relay hands back to the
//! UI, one per upstream partial response.

use serde::{Deserialize, Serialize};

use crate::message::ConversationMessage;

/// Sampling temperature used when the caller does not provide one.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// One discrete unit of streamed output.
///
/// Serialized externally tagged, which gives exactly the wire shape the UI
/// reads: `{"text": "..."}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamChunk {
    /// Incremental text to append to the live transcript.
    Text(String),
    /// Terminal failure; the consumer stops reading after this.
    Error(String),
}

impl StreamChunk {
    /// The text fragment, if this is a text chunk.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamChunk::Text(text) => Some(text),
            StreamChunk::Error(_) => None,
        }
    }

    /// The error message, if this is an error chunk.
    pub fn error(&self) -> Option<&str> {
        match self {
            StreamChunk::Error(message) => Some(message),
            StreamChunk::Text(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StreamChunk::Error(_))
    }
}

/// Inbound chat call: conversation history plus prompt options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Ordered prior turns, the last one being the new user message.
    #[serde(default)]
    pub history: Vec<ConversationMessage>,

    /// Free-form facts about the user, appended to the system instruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,

    /// Developer-mode replacement for the base persona.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_system_prompt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Personality tag; only the known tags select an addendum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
}

impl ChatRequest {
    /// Build a request from history alone.
    pub fn from_history(history: Vec<ConversationMessage>) -> Self {
        Self {
            history,
            ..Default::default()
        }
    }

    /// Temperature to send upstream.
    pub fn effective_temperature(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_chunk_wire_shape() {
        let text = serde_json::to_string(&StreamChunk::Text("Salut".to_string())).unwrap();
        assert_eq!(text, r#"{"text":"Salut"}"#);

        let err = serde_json::to_string(&StreamChunk::Error("boom".to_string())).unwrap();
        assert_eq!(err, r#"{"error":"boom"}"#);
    }

    #[test]
    fn test_stream_chunk_accessors() {
        let chunk = StreamChunk::Text("a".to_string());
        assert_eq!(chunk.text(), Some("a"));
        assert!(chunk.error().is_none());
        assert!(!chunk.is_error());

        let chunk = StreamChunk::Error("b".to_string());
        assert_eq!(chunk.error(), Some("b"));
        assert!(chunk.text().is_none());
        assert!(chunk.is_error());
    }

    #[test]
    fn test_chat_request_camel_case() {
        let json = r#"{
            "history": [{"role": "user", "parts": [{"type": "text", "text": "Bonjour"}]}],
            "overrideSystemPrompt": "Tu es un pirate.",
            "personality": "concise"
        }"#;
        let req: ChatRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.history.len(), 1);
        assert_eq!(req.override_system_prompt.as_deref(), Some("Tu es un pirate."));
        assert_eq!(req.personality.as_deref(), Some("concise"));
        assert!(req.memory.is_none());
    }

    #[test]
    fn test_default_temperature() {
        let req = ChatRequest::default();
        assert!((req.effective_temperature() - DEFAULT_TEMPERATURE).abs() < f64::EPSILON);

        let req = ChatRequest {
            temperature: Some(0.2),
            ..Default::default()
        };
        assert!((req.effective_temperature() - 0.2).abs() < f64::EPSILON);
    }
}

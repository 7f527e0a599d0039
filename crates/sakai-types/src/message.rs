//! Conversation history types exchanged with the UI.
//!
//! A [`ConversationMessage`] is one turn of the transcript as the browser
//! stores it: a role plus an ordered list of parts, each part being either a
//! text span or a binary attachment carried as a data URI.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a conversation turn.
///
/// Only `user` and `model` are forwarded upstream. Any other role string
/// (e.g. `system`, `tool`) is preserved so normalization can drop it instead
/// of failing deserialization of the whole history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Model,
    Other(String),
}

impl Role {
    /// Whether this role may be sent to the upstream model.
    pub fn is_conversational(&self) -> bool {
        matches!(self, Role::User | Role::Model)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
            Role::Other(other) => write!(f, "{other}"),
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "user" => Role::User,
            "model" => Role::Model,
            _ => Role::Other(s),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}

/// One part of a conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    /// Plain text typed by the user or produced by the model.
    Text { text: String },

    /// A file attached to the turn, usually an image.
    ///
    /// `data` is a data URI (`data:image/png;base64,...`) or a bare base64
    /// payload. `mime_type` is whatever the browser reported, which may be
    /// missing or the generic `application/octet-stream`.
    #[serde(alias = "file", alias = "image")]
    Attachment {
        data: String,
        #[serde(
            default,
            rename = "mimeType",
            alias = "mime_type",
            skip_serializing_if = "Option::is_none"
        )]
        mime_type: Option<String>,
    },
}

impl MessagePart {
    /// Build a text part.
    pub fn text(text: impl Into<String>) -> Self {
        MessagePart::Text { text: text.into() }
    }

    /// Build an attachment part with an optional explicit MIME type.
    pub fn attachment(data: impl Into<String>, mime_type: Option<&str>) -> Self {
        MessagePart::Attachment {
            data: data.into(),
            mime_type: mime_type.map(str::to_string),
        }
    }
}

/// A single turn of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

impl ConversationMessage {
    /// A user turn made of a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![MessagePart::text(text)],
        }
    }

    /// A model turn made of a single text part.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![MessagePart::text(text)],
        }
    }

    /// Concatenated text of every text part, ignoring attachments.
    pub fn text_content(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                MessagePart::Text { text } => Some(text.as_str()),
                MessagePart::Attachment { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::User, Role::Model] {
            let s = role.to_string();
            assert_eq!(Role::from(s), role);
        }
    }

    #[test]
    fn test_unknown_role_is_preserved() {
        let role: Role = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(role, Role::Other("system".to_string()));
        assert!(!role.is_conversational());
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"system\"");
    }

    #[test]
    fn test_text_message_deserialization() {
        let json = r#"{"role": "user", "parts": [{"type": "text", "text": "Bonjour"}]}"#;
        let msg: ConversationMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg, ConversationMessage::user("Bonjour"));
    }

    #[test]
    fn test_attachment_deserialization_with_mime() {
        let json = r#"{
            "role": "user",
            "parts": [{"type": "attachment", "data": "data:image/png;base64,AAAA", "mimeType": "image/png"}]
        }"#;
        let msg: ConversationMessage = serde_json::from_str(json).unwrap();
        match &msg.parts[0] {
            MessagePart::Attachment { data, mime_type } => {
                assert!(data.starts_with("data:image/png"));
                assert_eq!(mime_type.as_deref(), Some("image/png"));
            }
            other => panic!("expected attachment, got {other:?}"),
        }
    }

    #[test]
    fn test_attachment_alias_without_mime() {
        let json = r#"{"type": "image", "data": "data:image/webp;base64,UklGR"}"#;
        let part: MessagePart = serde_json::from_str(json).unwrap();
        assert_eq!(
            part,
            MessagePart::attachment("data:image/webp;base64,UklGR", None)
        );
    }

    #[test]
    fn test_missing_parts_defaults_to_empty() {
        let msg: ConversationMessage = serde_json::from_str(r#"{"role": "model"}"#).unwrap();
        assert!(msg.parts.is_empty());
    }

    #[test]
    fn test_text_content_skips_attachments() {
        let msg = ConversationMessage {
            role: Role::User,
            parts: vec![
                MessagePart::text("Regarde "),
                MessagePart::attachment("data:image/png;base64,AAAA", None),
                MessagePart::text("ça"),
            ],
        };
        assert_eq!(msg.text_content(), "Regarde ça");
    }
}

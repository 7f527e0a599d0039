//! History normalization: UI transcript -> upstream contents.

use sakai_types::llm::{Content, ContentPart, ContentRole, InlineData};
use sakai_types::message::{ConversationMessage, MessagePart, Role};

use super::mime::{payload_of, resolve_mime_type};

/// Map the UI history to upstream contents.
///
/// Messages with a role other than user/model are dropped. Empty text parts
/// and attachments without a payload are dropped, then messages left with
/// no part are dropped too. Whitespace counts as text. Order is preserved.
pub fn normalize_history(history: &[ConversationMessage]) -> Vec<Content> {
    history.iter().filter_map(normalize_message).collect()
}

fn normalize_message(message: &ConversationMessage) -> Option<Content> {
    let role = match message.role {
        Role::User => ContentRole::User,
        Role::Model => ContentRole::Model,
        Role::Other(_) => return None,
    };

    let parts: Vec<ContentPart> = message.parts.iter().filter_map(normalize_part).collect();
    if parts.is_empty() {
        return None;
    }
    Some(Content { role, parts })
}

fn normalize_part(part: &MessagePart) -> Option<ContentPart> {
    match part {
        MessagePart::Text { text } if text.is_empty() => None,
        MessagePart::Text { text } => Some(ContentPart::Text(text.clone())),
        MessagePart::Attachment { data, mime_type } => {
            let payload = payload_of(data).trim();
            if payload.is_empty() {
                return None;
            }
            Some(ContentPart::InlineData(InlineData {
                mime_type: resolve_mime_type(mime_type.as_deref(), data),
                data: payload.to_string(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(role: &str, parts: Vec<MessagePart>) -> ConversationMessage {
        ConversationMessage {
            role: Role::from(role.to_string()),
            parts,
        }
    }

    #[test]
    fn test_text_passes_through() {
        let contents = normalize_history(&[
            ConversationMessage::user("Bonjour"),
            ConversationMessage::model("Salut !"),
        ]);
        assert_eq!(
            contents,
            vec![
                Content {
                    role: ContentRole::User,
                    parts: vec![ContentPart::Text("Bonjour".to_string())],
                },
                Content {
                    role: ContentRole::Model,
                    parts: vec![ContentPart::Text("Salut !".to_string())],
                },
            ]
        );
    }

    #[test]
    fn test_other_roles_are_dropped() {
        let contents = normalize_history(&[
            message("system", vec![MessagePart::text("ignore-moi")]),
            ConversationMessage::user("Bonjour"),
            message("tool", vec![MessagePart::text("résultat")]),
        ]);
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].role, ContentRole::User);
    }

    #[test]
    fn test_webp_attachment_gets_mime_and_bare_payload() {
        let contents = normalize_history(&[message(
            "user",
            vec![
                MessagePart::text("Que vois-tu ?"),
                MessagePart::attachment("data:image/webp;base64,UklGRg==", None),
            ],
        )]);
        assert_eq!(
            contents[0].parts[1],
            ContentPart::InlineData(InlineData {
                mime_type: "image/webp".to_string(),
                data: "UklGRg==".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_parts_and_messages_are_dropped() {
        let contents = normalize_history(&[
            message("user", vec![MessagePart::text("")]),
            message("user", vec![MessagePart::attachment("data:image/png;base64,", None)]),
            message("model", vec![]),
            message(
                "user",
                vec![MessagePart::text(""), MessagePart::text("Reste")],
            ),
        ]);
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].parts, vec![ContentPart::Text("Reste".to_string())]);
    }

    #[test]
    fn test_whitespace_text_is_kept() {
        let contents = normalize_history(&[ConversationMessage::user("   ")]);
        assert_eq!(
            contents,
            vec![Content {
                role: ContentRole::User,
                parts: vec![ContentPart::Text("   ".to_string())],
            }]
        );
    }
}

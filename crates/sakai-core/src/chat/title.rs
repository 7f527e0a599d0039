//! Conversation title generation.
//!
//! `generate_title` names a conversation from its first exchange with one
//! non-streaming call. It never fails: any error or blank answer yields
//! [`DEFAULT_TITLE`].

use tracing::warn;

use sakai_types::llm::{
    Content, ContentPart, ContentRole, GenerateRequest, GenerationConfig, SafetySetting,
};

use crate::llm::provider::GenerativeModel;

/// Title used until (or instead of) a generated one.
pub const DEFAULT_TITLE: &str = "Nouvelle conversation";

const TITLE_TEMPERATURE: f64 = 0.3;

const TITLE_MAX_TOKENS: u32 = 32;

const TITLE_SYSTEM_PROMPT: &str = r#"Génère un titre court et descriptif (3 à 7 mots) pour cette conversation à partir du premier échange. Le titre doit refléter le sujet principal ou l'intention de l'utilisateur. Réponds UNIQUEMENT avec le titre, sans guillemets ni ponctuation finale.

Exemples :
- Corriger une erreur de compilation Rust
- Organiser un week-end à Lyon
- Comprendre les bases de la photosynthèse"#;

/// Generate a title for the exchange, falling back to [`DEFAULT_TITLE`].
#[tracing::instrument(
    name = "generate_title",
    skip_all,
    fields(gen_ai.system = model.name(), gen_ai.request.model = %model.model())
)]
pub async fn generate_title<M: GenerativeModel>(
    model: &M,
    first_user_message: &str,
    first_model_message: &str,
) -> String {
    if first_user_message.trim().is_empty() {
        return DEFAULT_TITLE.to_string();
    }

    let request = title_request(first_user_message, first_model_message);
    match model.generate(&request).await {
        Ok(response) => {
            clean_title(&response.extract_text()).unwrap_or_else(|| DEFAULT_TITLE.to_string())
        }
        Err(err) => {
            warn!(error = %err, "title generation failed");
            DEFAULT_TITLE.to_string()
        }
    }
}

fn title_request(first_user_message: &str, first_model_message: &str) -> GenerateRequest {
    let turn = |role, text: &str| Content {
        role,
        parts: vec![ContentPart::Text(text.to_string())],
    };

    let mut contents = vec![turn(ContentRole::User, first_user_message)];
    if !first_model_message.trim().is_empty() {
        contents.push(turn(ContentRole::Model, first_model_message));
    }
    contents.push(turn(
        ContentRole::User,
        "À partir de l'échange ci-dessus, génère un titre.",
    ));

    GenerateRequest {
        system_instruction: Some(TITLE_SYSTEM_PROMPT.to_string()),
        contents,
        generation_config: GenerationConfig {
            temperature: TITLE_TEMPERATURE,
            max_output_tokens: Some(TITLE_MAX_TOKENS),
            safety_settings: SafetySetting::moderate_defaults(),
        },
    }
}

/// First non-blank line, trimmed of whitespace, quotes and a trailing
/// period. `None` when nothing is left.
pub fn clean_title(raw: &str) -> Option<String> {
    let quotes: &[char] = &['"', '\'', '«', '»', '“', '”', '*', '`'];
    let line = raw.lines().map(str::trim).find(|l| !l.is_empty())?;
    let title = line
        .trim_start_matches("Titre :")
        .trim_start_matches("Titre:")
        .trim()
        .trim_matches(quotes)
        .trim()
        .trim_end_matches('.')
        .trim();
    (!title.is_empty()).then(|| title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Mutex;

    use sakai_types::llm::{GenerateResponse, LlmError};

    use crate::llm::session::StreamSession;

    struct TitleModel {
        reply: Result<String, String>,
        seen: Mutex<Option<GenerateRequest>>,
    }

    impl TitleModel {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err("quota".to_string()),
                seen: Mutex::new(None),
            }
        }
    }

    impl GenerativeModel for TitleModel {
        fn name(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-model"
        }

        fn generate(
            &self,
            request: &GenerateRequest,
        ) -> impl Future<Output = Result<GenerateResponse, LlmError>> + Send {
            *self.seen.lock().unwrap() = Some(request.clone());
            let reply = self.reply.clone();
            async move {
                reply
                    .map(GenerateResponse::from_text)
                    .map_err(|message| LlmError::Provider { message })
            }
        }

        fn stream_generate(
            &self,
            _request: GenerateRequest,
        ) -> impl Future<Output = Result<StreamSession, LlmError>> + Send {
            async { Err(LlmError::InvalidRequest("not scripted".to_string())) }
        }
    }

    #[tokio::test]
    async fn test_generates_cleaned_title() {
        let model = TitleModel::replying("  « Recette de la tarte Tatin. »\n");
        let title = generate_title(&model, "Comment faire une tarte Tatin ?", "Voici...").await;
        assert_eq!(title, "Recette de la tarte Tatin");

        let request = model.seen.lock().unwrap().clone().unwrap();
        assert!((request.generation_config.temperature - 0.3).abs() < f64::EPSILON);
        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[1].role, ContentRole::Model);
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_default() {
        let title = generate_title(&TitleModel::failing(), "Bonjour", "Salut").await;
        assert_eq!(title, DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn test_blank_reply_falls_back_to_default() {
        let title = generate_title(&TitleModel::replying(" \"\" "), "Bonjour", "Salut").await;
        assert_eq!(title, DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn test_blank_user_message_skips_call() {
        let model = TitleModel::replying("Jamais utilisé");
        assert_eq!(generate_title(&model, "  ", "").await, DEFAULT_TITLE);
        assert!(model.seen.lock().unwrap().is_none());
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("\"Voyage à Tokyo\"").as_deref(), Some("Voyage à Tokyo"));
        assert_eq!(clean_title("Titre : Budget mensuel").as_deref(), Some("Budget mensuel"));
        assert_eq!(clean_title("\n\nPremière ligne\nSeconde").as_deref(), Some("Première ligne"));
        assert_eq!(clean_title("   "), None);
    }
}

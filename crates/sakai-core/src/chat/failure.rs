//! Relay failures and their user-facing text.
//!
//! Every failure ends up as a single terminal error chunk carrying French
//! text; no structured code crosses the stream boundary.

use std::error::Error as _;

use sakai_types::llm::LlmError;

/// Used when an upstream error yields no usable text at all.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Une erreur inattendue est survenue lors de la génération de la réponse.";

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Aucun message à envoyer : l'historique de la conversation est vide.")]
    EmptyHistory,

    #[error(
        "Aucun contenu exploitable : tous les messages de l'historique sont vides ou non pris en charge."
    )]
    NoUsableContent,

    #[error("La génération s'est arrêtée de façon inattendue (raison : {reason}){}", detail_suffix(.detail))]
    AbnormalFinish {
        reason: String,
        detail: Option<String>,
    },

    #[error("La requête a été bloquée (raison : {reason}){}", detail_suffix(.detail))]
    PromptBlocked {
        reason: String,
        detail: Option<String>,
    },

    #[error("{}", describe_failure(.0))]
    Upstream(#[from] LlmError),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => format!(" : {text}"),
        _ => String::new(),
    }
}

/// Shown when the upstream rejects the API key.
pub const AUTHENTICATION_FAILED_MESSAGE: &str =
    "Le service de génération a refusé la clé d'API configurée.";

/// Best-effort message for an upstream error.
///
/// Rate limiting and rejected credentials get their own French text. Other
/// errors use their explicit message, then the message of their source, then
/// their display form, then [`GENERIC_FAILURE_MESSAGE`].
pub fn describe_failure(error: &LlmError) -> String {
    match error {
        LlmError::RateLimited { retry_after_ms } => return rate_limited_message(*retry_after_ms),
        LlmError::AuthenticationFailed => return AUTHENTICATION_FAILED_MESSAGE.to_string(),
        _ => {}
    }

    let non_blank = |s: String| (!s.trim().is_empty()).then_some(s);

    error
        .message()
        .map(str::to_string)
        .and_then(non_blank)
        .or_else(|| error.source().map(ToString::to_string).and_then(non_blank))
        .or_else(|| non_blank(error.to_string()))
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}

fn rate_limited_message(retry_after_ms: Option<u64>) -> String {
    let base = "Trop de requêtes envoyées au service de génération";
    match retry_after_ms {
        Some(ms) => format!("{base}, réessayez dans {} s.", ms.div_ceil(1000).max(1)),
        None => format!("{base}, réessayez dans un instant."),
    }
}

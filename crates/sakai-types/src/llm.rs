//! Generative model request/response types for Sakai.
//!
//! These types model the data shapes for hosted model interactions:
//! generation requests, partial and final responses, finish/block reasons,
//! and error handling. They are provider-agnostic; the Gemini wire format
//! lives in sakai-infra and converts into these.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a content entry sent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    User,
    Model,
}

impl fmt::Display for ContentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentRole::User => write!(f, "user"),
            ContentRole::Model => write!(f, "model"),
        }
    }
}

/// Base64 payload with its resolved MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineData {
    pub mime_type: String,
    /// Raw base64, without any `data:` prefix.
    pub data: String,
}

/// One part of a content entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentPart {
    Text(String),
    InlineData(InlineData),
}

/// A normalized conversation turn in the shape the model expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub role: ContentRole,
    pub parts: Vec<ContentPart>,
}

/// Harm categories the safety configuration applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

/// Blocking threshold for a harm category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
}

/// Threshold applied to one harm category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

impl SafetySetting {
    /// The fixed configuration used for every chat request: all four
    /// categories at the moderate-block threshold.
    pub fn moderate_defaults() -> Vec<SafetySetting> {
        [
            HarmCategory::Harassment,
            HarmCategory::HateSpeech,
            HarmCategory::SexuallyExplicit,
            HarmCategory::DangerousContent,
        ]
        .into_iter()
        .map(|category| SafetySetting {
            category,
            threshold: HarmBlockThreshold::BlockMediumAndAbove,
        })
        .collect()
    }
}

/// Sampling and safety parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    pub safety_settings: Vec<SafetySetting>,
}

/// Request to a generative model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub system_instruction: Option<String>,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

/// Why the model stopped generating a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Language,
    Other,
    Blocklist,
    ProhibitedContent,
    Spii,
    MalformedFunctionCall,
    Unspecified,
    /// A code this crate does not know yet, kept verbatim.
    Unknown(String),
}

impl FinishReason {
    /// Normal completion or length cap; every other reason is abnormal.
    pub fn is_normal(&self) -> bool {
        matches!(self, FinishReason::Stop | FinishReason::MaxTokens)
    }

    /// Upstream code for this reason.
    pub fn code(&self) -> &str {
        match self {
            FinishReason::Stop => "STOP",
            FinishReason::MaxTokens => "MAX_TOKENS",
            FinishReason::Safety => "SAFETY",
            FinishReason::Recitation => "RECITATION",
            FinishReason::Language => "LANGUAGE",
            FinishReason::Other => "OTHER",
            FinishReason::Blocklist => "BLOCKLIST",
            FinishReason::ProhibitedContent => "PROHIBITED_CONTENT",
            FinishReason::Spii => "SPII",
            FinishReason::MalformedFunctionCall => "MALFORMED_FUNCTION_CALL",
            FinishReason::Unspecified => "FINISH_REASON_UNSPECIFIED",
            FinishReason::Unknown(code) => code,
        }
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<&str> for FinishReason {
    fn from(s: &str) -> Self {
        match s {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::MaxTokens,
            "SAFETY" => FinishReason::Safety,
            "RECITATION" => FinishReason::Recitation,
            "LANGUAGE" => FinishReason::Language,
            "OTHER" => FinishReason::Other,
            "BLOCKLIST" => FinishReason::Blocklist,
            "PROHIBITED_CONTENT" => FinishReason::ProhibitedContent,
            "SPII" => FinishReason::Spii,
            "MALFORMED_FUNCTION_CALL" => FinishReason::MalformedFunctionCall,
            "FINISH_REASON_UNSPECIFIED" => FinishReason::Unspecified,
            other => FinishReason::Unknown(other.to_string()),
        }
    }
}

impl From<String> for FinishReason {
    fn from(s: String) -> Self {
        FinishReason::from(s.as_str())
    }
}

impl From<FinishReason> for String {
    fn from(reason: FinishReason) -> Self {
        reason.code().to_string()
    }
}

/// Why a prompt was refused before any candidate was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockReason {
    Safety,
    Other,
    Blocklist,
    ProhibitedContent,
    ImageSafety,
    Unspecified,
    Unknown(String),
}

impl BlockReason {
    pub fn code(&self) -> &str {
        match self {
            BlockReason::Safety => "SAFETY",
            BlockReason::Other => "OTHER",
            BlockReason::Blocklist => "BLOCKLIST",
            BlockReason::ProhibitedContent => "PROHIBITED_CONTENT",
            BlockReason::ImageSafety => "IMAGE_SAFETY",
            BlockReason::Unspecified => "BLOCK_REASON_UNSPECIFIED",
            BlockReason::Unknown(code) => code,
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<&str> for BlockReason {
    fn from(s: &str) -> Self {
        match s {
            "SAFETY" => BlockReason::Safety,
            "OTHER" => BlockReason::Other,
            "BLOCKLIST" => BlockReason::Blocklist,
            "PROHIBITED_CONTENT" => BlockReason::ProhibitedContent,
            "IMAGE_SAFETY" => BlockReason::ImageSafety,
            "BLOCK_REASON_UNSPECIFIED" => BlockReason::Unspecified,
            other => BlockReason::Unknown(other.to_string()),
        }
    }
}

impl From<String> for BlockReason {
    fn from(s: String) -> Self {
        BlockReason::from(s.as_str())
    }
}

impl From<BlockReason> for String {
    fn from(reason: BlockReason) -> Self {
        reason.code().to_string()
    }
}

/// Prompt-level feedback reported when the request itself is refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptFeedback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<BlockReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason_message: Option<String>,
}

/// One generated candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<ContentPart>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    /// Human-readable detail accompanying an abnormal finish.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_message: Option<String>,
}

impl Candidate {
    /// A candidate holding a single text part.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            content: Some(vec![ContentPart::Text(text.into())]),
            ..Default::default()
        }
    }

    /// Concatenated text of every text part.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .flatten()
            .filter_map(|part| match part {
                ContentPart::Text(text) => Some(text.as_str()),
                ContentPart::InlineData(_) => None,
            })
            .collect()
    }
}

/// A partial (streamed) or final (aggregated) model response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Direct text shortcut, set by providers that expose one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl GenerateResponse {
    /// Partial response carrying one text fragment in its first candidate.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate::with_text(text)],
            ..Default::default()
        }
    }

    /// Text of this response: the direct field when non-empty, otherwise the
    /// text parts of the first candidate.
    pub fn extract_text(&self) -> String {
        match self.text.as_deref() {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => self
                .candidates
                .first()
                .map(Candidate::text)
                .unwrap_or_default(),
        }
    }
}

/// Token usage reported by the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from generative model operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("transport error")]
    Transport {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("rate limited{}", retry_suffix(.retry_after_ms))]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

fn retry_suffix(retry_after_ms: &Option<u64>) -> String {
    match retry_after_ms {
        Some(ms) => format!(" (retry after {ms}ms)"),
        None => String::new(),
    }
}

impl LlmError {
    /// Wrap a lower-level error (HTTP client, I/O) as a transport failure.
    pub fn transport(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        LlmError::Transport {
            source: Box::new(source),
        }
    }

    /// The explicit message carried by this error, if it has one.
    pub fn message(&self) -> Option<&str> {
        match self {
            LlmError::Provider { message } | LlmError::Http { message, .. } => Some(message),
            LlmError::Stream(message)
            | LlmError::Deserialization(message)
            | LlmError::InvalidRequest(message) => Some(message),
            LlmError::Transport { .. }
            | LlmError::RateLimited { .. }
            | LlmError::AuthenticationFailed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_rate_limited_display() {
        let err = LlmError::RateLimited {
            retry_after_ms: Some(2000),
        };
        assert_eq!(err.to_string(), "rate limited (retry after 2000ms)");
        let err = LlmError::RateLimited {
            retry_after_ms: None,
        };
        assert_eq!(err.to_string(), "rate limited");
    }

    #[test]
    fn test_finish_reason_roundtrip() {
        for code in [
            "STOP",
            "MAX_TOKENS",
            "SAFETY",
            "RECITATION",
            "LANGUAGE",
            "OTHER",
            "BLOCKLIST",
            "PROHIBITED_CONTENT",
            "SPII",
            "MALFORMED_FUNCTION_CALL",
            "FINISH_REASON_UNSPECIFIED",
        ] {
            let reason = FinishReason::from(code);
            assert!(!matches!(reason, FinishReason::Unknown(_)), "{code}");
            assert_eq!(reason.to_string(), code);
        }
    }

    #[test]
    fn test_finish_reason_unknown_preserved() {
        let reason: FinishReason = serde_json::from_str("\"IMAGE_OTHER\"").unwrap();
        assert_eq!(reason, FinishReason::Unknown("IMAGE_OTHER".to_string()));
        assert_eq!(serde_json::to_string(&reason).unwrap(), "\"IMAGE_OTHER\"");
    }

    #[test]
    fn test_finish_reason_normal() {
        assert!(FinishReason::Stop.is_normal());
        assert!(FinishReason::MaxTokens.is_normal());
        assert!(!FinishReason::Safety.is_normal());
        assert!(!FinishReason::Unknown("X".to_string()).is_normal());
    }

    #[test]
    fn test_block_reason_serde() {
        let reason: BlockReason = serde_json::from_str("\"SAFETY\"").unwrap();
        assert_eq!(reason, BlockReason::Safety);
        assert_eq!(reason.to_string(), "SAFETY");
    }

    #[test]
    fn test_moderate_safety_defaults() {
        let settings = SafetySetting::moderate_defaults();
        assert_eq!(settings.len(), 4);
        assert!(settings
            .iter()
            .all(|s| s.threshold == HarmBlockThreshold::BlockMediumAndAbove));
        let json = serde_json::to_value(&settings[0]).unwrap();
        assert_eq!(json["category"], "HARM_CATEGORY_HARASSMENT");
        assert_eq!(json["threshold"], "BLOCK_MEDIUM_AND_ABOVE");
    }

    #[test]
    fn test_extract_text_prefers_direct_field() {
        let resp = GenerateResponse {
            text: Some("direct".to_string()),
            candidates: vec![Candidate::with_text("from parts")],
            ..Default::default()
        };
        assert_eq!(resp.extract_text(), "direct");
    }

    #[test]
    fn test_extract_text_concatenates_parts() {
        let resp = GenerateResponse {
            text: Some(String::new()),
            candidates: vec![Candidate {
                content: Some(vec![
                    ContentPart::Text("Sa".to_string()),
                    ContentPart::InlineData(InlineData {
                        mime_type: "image/png".to_string(),
                        data: "AAAA".to_string(),
                    }),
                    ContentPart::Text("lut".to_string()),
                ]),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(resp.extract_text(), "Salut");
    }

    #[test]
    fn test_extract_text_empty_response() {
        assert_eq!(GenerateResponse::default().extract_text(), "");
    }

    #[test]
    fn test_llm_error_message_accessor() {
        let err = LlmError::Provider {
            message: "quota".to_string(),
        };
        assert_eq!(err.message(), Some("quota"));
        assert!(LlmError::AuthenticationFailed.message().is_none());
    }

    #[test]
    fn test_transport_error_exposes_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connexion perdue");
        let err = LlmError::transport(io);
        assert!(err.message().is_none());
        assert_eq!(err.source().unwrap().to_string(), "connexion perdue");
    }
}

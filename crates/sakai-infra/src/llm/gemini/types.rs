//! Gemini `generateContent` wire types.
//!
//! These mirror the REST payloads (camelCase on the wire) and convert to and
//! from the provider-agnostic types in sakai-types.

use serde::{Deserialize, Serialize};

use sakai_types::llm::{
    Candidate, Content, ContentPart, GenerateRequest, GenerateResponse, InlineData,
    PromptFeedback, SafetySetting, Usage,
};

/// Request body for `generateContent` and `streamGenerateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    pub generation_config: GeminiGenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Content container used in both requests and responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// Untagged union of content parts.
///
/// Variant order matters for `#[serde(untagged)]` decoding. Parts this client
/// does not use (function calls, code execution) land in `Other`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeminiPart {
    Text {
        text: String,
        /// Set on reasoning summaries, which are not part of the answer.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thought: Option<bool>,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiBlob,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiBlob {
    pub mime_type: String,
    pub data: String,
}

/// Response envelope; one per SSE event when streaming.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    pub prompt_feedback: Option<GeminiPromptFeedback>,
    #[serde(default)]
    pub usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub finish_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
    #[serde(default)]
    pub block_reason_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsage {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiErrorEnvelope {
    pub error: GeminiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl From<&GenerateRequest> for GeminiRequest {
    fn from(request: &GenerateRequest) -> Self {
        Self {
            contents: request.contents.iter().map(GeminiContent::from).collect(),
            system_instruction: request
                .system_instruction
                .as_ref()
                .filter(|text| !text.is_empty())
                .map(|text| GeminiContent {
                    role: None,
                    parts: vec![GeminiPart::Text {
                        text: text.clone(),
                        thought: None,
                    }],
                }),
            generation_config: GeminiGenerationConfig {
                temperature: request.generation_config.temperature,
                max_output_tokens: request.generation_config.max_output_tokens,
            },
            safety_settings: request.generation_config.safety_settings.clone(),
        }
    }
}

impl From<&Content> for GeminiContent {
    fn from(content: &Content) -> Self {
        Self {
            role: Some(content.role.to_string()),
            parts: content
                .parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text(text) => GeminiPart::Text {
                        text: text.clone(),
                        thought: None,
                    },
                    ContentPart::InlineData(blob) => GeminiPart::InlineData {
                        inline_data: GeminiBlob {
                            mime_type: blob.mime_type.clone(),
                            data: blob.data.clone(),
                        },
                    },
                })
                .collect(),
        }
    }
}

impl From<GeminiResponse> for GenerateResponse {
    fn from(response: GeminiResponse) -> Self {
        let candidates = response
            .candidates
            .into_iter()
            .enumerate()
            .map(|(position, candidate)| Candidate {
                index: candidate.index.unwrap_or(position as u32),
                content: candidate.content.map(|content| {
                    content
                        .parts
                        .into_iter()
                        .filter_map(answer_part)
                        .collect()
                }),
                finish_reason: candidate.finish_reason.map(Into::into),
                finish_message: candidate.finish_message,
            })
            .collect();

        GenerateResponse {
            text: None,
            candidates,
            prompt_feedback: response.prompt_feedback.map(|feedback| PromptFeedback {
                block_reason: feedback.block_reason.map(Into::into),
                block_reason_message: feedback.block_reason_message,
            }),
            usage: response.usage_metadata.map(|usage| Usage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            }),
        }
    }
}

/// Keep answer text and inline data; drop thoughts and unknown parts.
fn answer_part(part: GeminiPart) -> Option<ContentPart> {
    match part {
        GeminiPart::Text {
            thought: Some(true),
            ..
        } => None,
        GeminiPart::Text { text, .. } => Some(ContentPart::Text(text)),
        GeminiPart::InlineData { inline_data } => Some(ContentPart::InlineData(InlineData {
            mime_type: inline_data.mime_type,
            data: inline_data.data,
        })),
        GeminiPart::Other(_) => None,
    }
}

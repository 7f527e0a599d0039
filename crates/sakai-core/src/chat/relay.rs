//! ChatRelay -- turns one streaming generation call into a stream of chunks.
//!
//! A producer task owns the upstream call and writes [`StreamChunk`]s into a
//! bounded channel; the consumer pulls them through [`ChunkStream`] at its
//! own pace. Every failure degrades to a single terminal error chunk, and the
//! stream always ends once the producer is done.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use chrono::NaiveDate;
use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info, info_span, warn};

use sakai_types::chat::{ChatRequest, StreamChunk};
use sakai_types::llm::{
    Content, GenerateRequest, GenerateResponse, GenerationConfig, SafetySetting,
};
use sakai_types::message::ConversationMessage;

use super::failure::RelayError;
use super::normalize::normalize_history;
use super::sink::ChunkSink;
use crate::llm::provider::GenerativeModel;
use crate::llm::session::StreamSession;
use crate::prompt;

/// Chunks buffered between producer and consumer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// Lazy, single-pass stream of chunks for one chat request.
///
/// Dropping it stops the producer at its next send.
#[derive(Debug)]
pub struct ChunkStream {
    rx: mpsc::Receiver<StreamChunk>,
}

impl Stream for ChunkStream {
    type Item = StreamChunk;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Relays chat requests to a generative model.
pub struct ChatRelay<M> {
    model: Arc<M>,
    channel_capacity: usize,
}

impl<M> Clone for ChatRelay<M> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            channel_capacity: self.channel_capacity,
        }
    }
}

impl<M: GenerativeModel + 'static> ChatRelay<M> {
    pub fn new(model: Arc<M>) -> Self {
        Self {
            model,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Override the channel capacity (at least 1).
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Stream a reply to `request`, composing the instruction for today.
    pub fn stream_chat(&self, request: &ChatRequest) -> ChunkStream {
        self.stream_chat_on(request, prompt::today())
    }

    /// Stream a reply to `request`, composing the instruction for `date`.
    pub fn stream_chat_on(&self, request: &ChatRequest, date: NaiveDate) -> ChunkStream {
        let instruction = prompt::system_instruction_for(request, date);
        self.relay_chat(&request.history, instruction, request.effective_temperature())
    }

    /// Stream a reply to `history` under an already composed instruction.
    ///
    /// Must be called from within a tokio runtime.
    pub fn relay_chat(
        &self,
        history: &[ConversationMessage],
        instruction: String,
        temperature: f64,
    ) -> ChunkStream {
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let sink = ChunkSink::new(tx);

        let contents = normalize_history(history);
        let empty_error = history_error(history, &contents);
        let request = GenerateRequest {
            system_instruction: Some(instruction),
            contents,
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens: None,
                safety_settings: SafetySetting::moderate_defaults(),
            },
        };

        let span = info_span!(
            "gen_ai.chat",
            gen_ai.system = self.model.name(),
            gen_ai.request.model = %self.model.model(),
            gen_ai.request.temperature = temperature,
            gen_ai.request.stream = true,
            history_len = history.len(),
        );

        let model = Arc::clone(&self.model);
        tokio::spawn(produce(model, request, empty_error, sink).instrument(span));

        ChunkStream { rx }
    }
}

/// The error to report instead of calling the model, if any.
fn history_error(history: &[ConversationMessage], contents: &[Content]) -> Option<RelayError> {
    if !contents.is_empty() {
        None
    } else if history.is_empty() {
        Some(RelayError::EmptyHistory)
    } else {
        Some(RelayError::NoUsableContent)
    }
}

async fn produce<M: GenerativeModel>(
    model: Arc<M>,
    request: GenerateRequest,
    empty_error: Option<RelayError>,
    mut sink: ChunkSink,
) {
    let outcome = match empty_error {
        Some(err) => Err(err),
        None => forward(model.as_ref(), request, &sink).await,
    };

    match outcome {
        Ok(emitted) => info!(chunks = emitted, "chat relay finished"),
        Err(err) => {
            warn!(error = %err, "chat relay failed");
            if sink.is_accepting() {
                sink.send(StreamChunk::Error(err.to_string())).await;
            } else {
                debug!("consumer gone; error chunk not delivered");
            }
        }
    }

    sink.close();
}

/// Run the upstream call, forwarding one text chunk per non-empty partial.
/// Returns the number of text chunks delivered.
async fn forward<M: GenerativeModel>(
    model: &M,
    request: GenerateRequest,
    sink: &ChunkSink,
) -> Result<usize, RelayError> {
    let StreamSession {
        mut stream,
        response,
    } = model.stream_generate(request).await?;

    let mut emitted = 0;
    while let Some(partial) = stream.next().await {
        let text = partial?.extract_text();
        if text.is_empty() {
            continue;
        }
        if !sink.send(StreamChunk::Text(text)).await {
            debug!(emitted, "consumer went away; stopping relay");
            return Ok(emitted);
        }
        emitted += 1;
    }

    let final_response = response.await?;
    check_final(&final_response)?;
    Ok(emitted)
}

/// Inspect the final response for an abnormal finish or a blocked prompt.
fn check_final(response: &GenerateResponse) -> Result<(), RelayError> {
    match response.candidates.last() {
        Some(last) => match &last.finish_reason {
            Some(reason) if !reason.is_normal() => Err(RelayError::AbnormalFinish {
                reason: reason.code().to_string(),
                detail: last.finish_message.clone(),
            }),
            _ => Ok(()),
        },
        None => match &response.prompt_feedback {
            Some(feedback) => match &feedback.block_reason {
                Some(reason) => Err(RelayError::PromptBlocked {
                    reason: reason.code().to_string(),
                    detail: feedback.block_reason_message.clone(),
                }),
                None => Ok(()),
            },
            None => Ok(()),
        },
    }
}

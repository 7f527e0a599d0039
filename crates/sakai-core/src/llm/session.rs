//! Streaming session returned by [`GenerativeModel::stream_generate`].
//!
//! A session pairs the stream of partial responses with a future resolving
//! to the final aggregated response, available once the stream has been
//! drained.
//!
//! [`GenerativeModel::stream_generate`]: super::provider::GenerativeModel::stream_generate

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use tokio::sync::oneshot;

use sakai_types::llm::{Candidate, ContentPart, GenerateResponse, LlmError, PromptFeedback, Usage};

/// Stream of partial responses.
pub type PartialStream =
    Pin<Box<dyn Stream<Item = Result<GenerateResponse, LlmError>> + Send + 'static>>;

/// Future resolving to the final response.
pub type FinalResponse =
    Pin<Box<dyn Future<Output = Result<GenerateResponse, LlmError>> + Send + 'static>>;

/// An open streaming generation call.
pub struct StreamSession {
    pub stream: PartialStream,
    pub response: FinalResponse,
}

impl StreamSession {
    /// Build a session from explicit parts.
    pub fn new(stream: PartialStream, response: FinalResponse) -> Self {
        Self { stream, response }
    }

    /// Build a session whose final response is the aggregate of every
    /// partial response yielded by `partials`.
    ///
    /// The final response only resolves successfully after the stream has
    /// ended without error; a failed or abandoned stream makes it resolve to
    /// [`LlmError::Stream`].
    pub fn aggregated<S>(partials: S) -> Self
    where
        S: Stream<Item = Result<GenerateResponse, LlmError>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();

        let stream = async_stream::stream! {
            let mut aggregator = ResponseAggregator::default();
            let mut failed = false;
            let mut partials = std::pin::pin!(partials);

            while let Some(item) = partials.next().await {
                match &item {
                    Ok(partial) => aggregator.push(partial),
                    Err(_) => failed = true,
                }
                yield item;
                if failed {
                    break;
                }
            }

            if !failed {
                let _ = tx.send(aggregator.finish());
            }
        };

        let response = async move {
            rx.await.map_err(|_| {
                LlmError::Stream("stream ended before the final response was available".to_string())
            })
        };

        Self {
            stream: Box::pin(stream),
            response: Box::pin(response),
        }
    }
}

/// Folds partial responses into the final one.
///
/// Text parts of the same candidate are concatenated; the latest finish
/// reason, finish message, prompt feedback and usage win.
#[derive(Debug, Default)]
pub struct ResponseAggregator {
    text: String,
    candidates: BTreeMap<u32, Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage: Option<Usage>,
}

impl ResponseAggregator {
    pub fn push(&mut self, partial: &GenerateResponse) {
        if let Some(text) = &partial.text {
            self.text.push_str(text);
        }

        for candidate in &partial.candidates {
            let entry = self
                .candidates
                .entry(candidate.index)
                .or_insert_with(|| Candidate {
                    index: candidate.index,
                    ..Default::default()
                });

            if let Some(parts) = &candidate.content {
                let merged = entry.content.get_or_insert_with(Vec::new);
                for part in parts {
                    match (merged.last_mut(), part) {
                        (Some(ContentPart::Text(existing)), ContentPart::Text(more)) => {
                            existing.push_str(more);
                        }
                        _ => merged.push(part.clone()),
                    }
                }
            }
            if candidate.finish_reason.is_some() {
                entry.finish_reason = candidate.finish_reason.clone();
            }
            if candidate.finish_message.is_some() {
                entry.finish_message = candidate.finish_message.clone();
            }
        }

        if partial.prompt_feedback.is_some() {
            self.prompt_feedback = partial.prompt_feedback.clone();
        }
        if partial.usage.is_some() {
            self.usage = partial.usage;
        }
    }

    pub fn finish(self) -> GenerateResponse {
        GenerateResponse {
            text: (!self.text.is_empty()).then_some(self.text),
            candidates: self.candidates.into_values().collect(),
            prompt_feedback: self.prompt_feedback,
            usage: self.usage,
        }
    }
}

//! GenerativeModel trait definition.
//!
//! This is the core abstraction that all hosted model backends implement.
//! Uses RPITIT for both calls; the streaming call resolves to a
//! [`StreamSession`] whose parts are boxed so sessions can cross the
//! `BoxGenerativeModel` wrapper.

use std::future::Future;

use sakai_types::llm::{GenerateRequest, GenerateResponse, LlmError};

use super::session::StreamSession;

/// Trait for generative model backends (Gemini, test doubles, ...).
///
/// Implementations live in sakai-infra (e.g., `GeminiProvider`).
pub trait GenerativeModel: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Send a generation request and receive the full response.
    fn generate(
        &self,
        request: &GenerateRequest,
    ) -> impl Future<Output = Result<GenerateResponse, LlmError>> + Send;

    /// Open a streaming generation call.
    ///
    /// Resolves once the upstream accepted the request; partial responses
    /// then arrive through the session's stream and the aggregated response
    /// through its `response` future.
    fn stream_generate(
        &self,
        request: GenerateRequest,
    ) -> impl Future<Output = Result<StreamSession, LlmError>> + Send;
}

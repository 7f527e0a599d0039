//! BoxGenerativeModel -- object-safe dynamic dispatch wrapper for GenerativeModel.
//!
//! 1. Define an object-safe `GenerativeModelDyn` trait with boxed futures
//! 2. Blanket-impl `GenerativeModelDyn` for all `T: GenerativeModel`
//! 3. `BoxGenerativeModel` wraps `Box<dyn GenerativeModelDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use sakai_types::llm::{GenerateRequest, GenerateResponse, LlmError};

use super::provider::GenerativeModel;
use super::session::StreamSession;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of [`GenerativeModel`] with boxed futures.
///
/// A blanket implementation is provided for all types implementing
/// `GenerativeModel`.
pub trait GenerativeModelDyn: Send + Sync {
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    fn generate_boxed<'a>(
        &'a self,
        request: &'a GenerateRequest,
    ) -> BoxFuture<'a, Result<GenerateResponse, LlmError>>;

    fn stream_generate_boxed(
        &self,
        request: GenerateRequest,
    ) -> BoxFuture<'_, Result<StreamSession, LlmError>>;
}

impl<T: GenerativeModel> GenerativeModelDyn for T {
    fn name(&self) -> &str {
        GenerativeModel::name(self)
    }

    fn model(&self) -> &str {
        GenerativeModel::model(self)
    }

    fn generate_boxed<'a>(
        &'a self,
        request: &'a GenerateRequest,
    ) -> BoxFuture<'a, Result<GenerateResponse, LlmError>> {
        Box::pin(self.generate(request))
    }

    fn stream_generate_boxed(
        &self,
        request: GenerateRequest,
    ) -> BoxFuture<'_, Result<StreamSession, LlmError>> {
        Box::pin(self.stream_generate(request))
    }
}

/// Type-erased generative model for runtime provider selection.
///
/// Since `GenerativeModel` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxGenerativeModel` itself implements `GenerativeModel`, so it
/// can be handed to the relay like any concrete provider.
pub struct BoxGenerativeModel {
    inner: Box<dyn GenerativeModelDyn>,
}

impl BoxGenerativeModel {
    /// Wrap a concrete `GenerativeModel` in a type-erased box.
    pub fn new<T: GenerativeModel + 'static>(model: T) -> Self {
        Self {
            inner: Box::new(model),
        }
    }
}

impl GenerativeModel for BoxGenerativeModel {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    fn generate(
        &self,
        request: &GenerateRequest,
    ) -> impl Future<Output = Result<GenerateResponse, LlmError>> + Send {
        async move { self.inner.generate_boxed(request).await }
    }

    fn stream_generate(
        &self,
        request: GenerateRequest,
    ) -> impl Future<Output = Result<StreamSession, LlmError>> + Send {
        self.inner.stream_generate_boxed(request)
    }
}

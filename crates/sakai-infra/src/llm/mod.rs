//! Generative model provider implementations.
//!
//! Provides the provider factory ([`create_model`]) that builds the
//! configured model as a [`BoxGenerativeModel`].

pub mod gemini;

use secrecy::SecretString;

use sakai_core::llm::box_provider::BoxGenerativeModel;
use sakai_types::config::GlobalConfig;
use sakai_types::llm::LlmError;

use self::gemini::GeminiProvider;

/// Create the configured model.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn create_model(
    config: &GlobalConfig,
    api_key: SecretString,
) -> Result<BoxGenerativeModel, LlmError> {
    let provider =
        GeminiProvider::new(api_key, config.model.clone())?.with_base_url(config.base_url.clone());
    tracing::debug!(model = %config.model, base_url = %config.base_url, "created gemini model");
    Ok(BoxGenerativeModel::new(provider))
}

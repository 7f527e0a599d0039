//! Application state shared by the CLI and the SSE API.
//!
//! AppState pins the relay to the boxed model built from configuration, so
//! handlers and the chat loop never name a concrete provider.

use std::path::PathBuf;
use std::sync::Arc;

use sakai_core::chat::ChatRelay;
use sakai_core::llm::box_provider::BoxGenerativeModel;
use sakai_infra::config::{load_global_config, resolve_data_dir};
use sakai_infra::llm::create_model;
use sakai_infra::secret::resolve_api_key;
use sakai_types::config::GlobalConfig;

/// Relay over whichever model the configuration selects.
pub type ConcreteChatRelay = ChatRelay<BoxGenerativeModel>;

/// Shared application state.
///
/// Cheap to clone: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub relay: ConcreteChatRelay,
    pub model: Arc<BoxGenerativeModel>,
    pub config: Arc<GlobalConfig>,
}

impl AppState {
    /// Build state around an already constructed model.
    pub fn new(model: BoxGenerativeModel, config: GlobalConfig) -> Self {
        let model = Arc::new(model);
        let relay = ChatRelay::new(Arc::clone(&model))
            .with_channel_capacity(config.channel_capacity);
        Self {
            relay,
            model,
            config: Arc::new(config),
        }
    }

    /// Load `config.toml`, apply `overrides`, resolve the API key and build
    /// the model.
    pub async fn init(overrides: impl FnOnce(&mut GlobalConfig)) -> anyhow::Result<Self> {
        let data_dir: PathBuf = resolve_data_dir();
        let mut config = load_global_config(&data_dir).await;
        overrides(&mut config);

        let api_key = resolve_api_key(&config)?;
        let model = create_model(&config, api_key)?;

        tracing::info!(
            data_dir = %data_dir.display(),
            model = %config.model,
            "application state initialized"
        );
        Ok(Self::new(model, config))
    }
}

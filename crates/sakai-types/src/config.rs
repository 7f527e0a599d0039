//! Global configuration types for Sakai.
//!
//! `GlobalConfig` represents the top-level `config.toml` that selects the
//! hosted model, where its API key comes from, and how the server binds.

use serde::{Deserialize, Serialize};

use crate::chat::DEFAULT_TEMPERATURE;
use crate::error::ConfigError;

/// Sampling temperatures accepted upstream.
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;

/// Top-level configuration.
///
/// Loaded from `~/.sakai/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Model identifier passed to the provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generative language API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Temperature used when a request does not carry one.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Capacity of the relay channel between producer and consumer.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_channel_capacity() -> usize {
    32
}

impl GlobalConfig {
    /// Reject values the relay or the upstream cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !TEMPERATURE_RANGE.contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "temperature".to_string(),
                reason: format!(
                    "{} is outside {}..={}",
                    self.temperature,
                    TEMPERATURE_RANGE.start(),
                    TEMPERATURE_RANGE.end()
                ),
            });
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "channel_capacity".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            channel_capacity: default_channel_capacity(),
            server: ServerConfig::default(),
        }
    }
}

/// HTTP server binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

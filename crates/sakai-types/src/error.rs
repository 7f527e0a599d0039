use thiserror::Error;

/// Errors related to configuration and credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key not found: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

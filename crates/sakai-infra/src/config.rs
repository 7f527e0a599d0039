//! Global configuration loader for Sakai.
//!
//! Reads `config.toml` from the data directory (`~/.sakai/` by default) and
//! deserializes it into [`GlobalConfig`]. Falls back to defaults when the
//! file is missing, malformed or holds out-of-range values.

use std::path::{Path, PathBuf};

use sakai_types::config::GlobalConfig;

/// Resolve the data directory.
///
/// Priority:
/// 1. `SAKAI_DATA_DIR` environment variable
/// 2. `~/.sakai`
/// 3. `.sakai` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SAKAI_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".sakai");
    }

    PathBuf::from(".sakai")
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse or validate, logs a warning and
///   returns the default.
/// - Otherwise returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => match config.validate() {
            Ok(()) => config,
            Err(err) => {
                tracing::warn!("Invalid {}: {err}, using defaults", config_path.display());
                GlobalConfig::default()
            }
        },
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

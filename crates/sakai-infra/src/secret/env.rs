//! Environment variable API key lookup.
//!
//! The variable name comes from `api_key_env` in `config.toml`
//! (`GEMINI_API_KEY` by default). Blank or non-Unicode values count as
//! missing.

use secrecy::SecretString;

use sakai_types::config::GlobalConfig;
use sakai_types::error::ConfigError;

/// Read the API key named by `config.api_key_env`.
pub fn resolve_api_key(config: &GlobalConfig) -> Result<SecretString, ConfigError> {
    lookup(&config.api_key_env, |name| std::env::var(name).ok())
}

fn lookup(
    name: &str,
    get: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    match get(name) {
        Some(value) if !value.trim().is_empty() => Ok(SecretString::from(value.trim().to_string())),
        _ => Err(ConfigError::MissingApiKey(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_present_key_is_trimmed() {
        let key = lookup("GEMINI_API_KEY", |_| Some(" abc123\n".to_string())).unwrap();
        assert_eq!(key.expose_secret(), "abc123");
    }

    #[test]
    fn test_missing_key() {
        let err = lookup("MY_KEY", |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey(ref name) if name == "MY_KEY"));
    }

    #[test]
    fn test_blank_key_is_missing() {
        assert!(lookup("MY_KEY", |_| Some("   ".to_string())).is_err());
    }

    #[test]
    fn test_resolve_from_env() {
        let config = GlobalConfig {
            api_key_env: "SAKAI_TEST_RESOLVE_API_KEY".to_string(),
            ..Default::default()
        };
        // SAFETY: This variable is unique to this test.
        unsafe {
            std::env::set_var("SAKAI_TEST_RESOLVE_API_KEY", "from-env");
        }
        let key = resolve_api_key(&config).unwrap();
        assert_eq!(key.expose_secret(), "from-env");
        unsafe {
            std::env::remove_var("SAKAI_TEST_RESOLVE_API_KEY");
        }
    }
}

//! Agent configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ANTHROPIC_API_KEY` - Anthropic API key (the only secret; checked
//!   before any LLM call is attempted)
//!
//! ## Optional
//! - `SCOUT_MODEL` - Model ID (default: claude-sonnet-4-20250514)
//! - `SCOUT_RESULT_CAP` - Max search rows to materialize (default: 20)
//! - `SCOUT_REQUEST_TIMEOUT_SECS` - Overall per-request wall-clock budget
//!   (default: 120)
//! - `SCOUT_FIELD_WAIT_SECS` - Per-page readiness wait (default: 10)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_RESULT_CAP: usize = 20;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const DEFAULT_FIELD_WAIT_SECS: u64 = 10;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Agent configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ScoutConfig {
    /// Anthropic API key
    pub api_key: SecretString,
    /// Model ID (e.g., claude-sonnet-4-20250514)
    pub model: String,
    /// Max search rows to materialize per request
    pub result_cap: usize,
    /// Overall per-request wall-clock budget
    pub request_timeout: Duration,
    /// Per-page readiness wait for the renderer
    pub field_wait: Duration,
}

impl std::fmt::Debug for ScoutConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoutConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("result_cap", &self.result_cap)
            .field("request_timeout", &self.request_timeout)
            .field("field_wait", &self.field_wait)
            .finish()
    }
}

impl ScoutConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API key is missing or looks like a
    /// placeholder, or if a numeric variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = get_validated_secret("ANTHROPIC_API_KEY")?;
        let model = get_env_or_default("SCOUT_MODEL", DEFAULT_MODEL);
        let result_cap = parse_env_or("SCOUT_RESULT_CAP", DEFAULT_RESULT_CAP)?;
        let request_timeout = Duration::from_secs(parse_env_or(
            "SCOUT_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);
        let field_wait =
            Duration::from_secs(parse_env_or("SCOUT_FIELD_WAIT_SECS", DEFAULT_FIELD_WAIT_SECS)?);

        Ok(Self {
            api_key,
            model,
            result_cap,
            request_timeout,
            field_wait,
        })
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to a default when unset.
fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Reject secrets that are obviously placeholders.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(
            result.expect_err("must reject"),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_changeme() {
        assert!(validate_secret_strength("changeme123", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength("sk-ant-a01b9Xq3mZ", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ScoutConfig {
            api_key: SecretString::from("sk-ant-super-secret-key"),
            model: DEFAULT_MODEL.to_string(),
            result_cap: DEFAULT_RESULT_CAP,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            field_wait: Duration::from_secs(DEFAULT_FIELD_WAIT_SECS),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(debug_output.contains(DEFAULT_MODEL));
        assert!(!debug_output.contains("sk-ant-super-secret-key"));
    }

    #[test]
    fn test_default_model() {
        assert_eq!(DEFAULT_MODEL, "claude-sonnet-4-20250514");
    }
}

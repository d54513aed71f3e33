//! Configuration
//!
//! Loaded from TOML, then overridden from the environment:
//!
//! ```toml
//! max_attempts = 3
//! model = "gpt-4o"
//! api_base = "https://api.openai.com/v1"
//! temperature = 0.1
//! request_timeout_secs = 60
//! api_key_env = "OPENAI_API_KEY"
//! ```

use crate::error::ConfigError;
use crate::orchestrator::DEFAULT_MAX_ATTEMPTS;
use crate::types::ModelSelector;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `max_attempts`
pub const ENV_MAX_ATTEMPTS: &str = "LEXIS_MAX_ATTEMPTS";
/// Environment variable overriding `model`
pub const ENV_MODEL: &str = "LEXIS_MODEL";
/// Environment variable overriding `api_base`
pub const ENV_API_BASE: &str = "LEXIS_API_BASE";

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_temperature() -> f64 {
    0.1
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// Lexis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LexisConfig {
    /// Generation attempts per request
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Model identifier
    #[serde(default)]
    pub model: ModelSelector,
    /// Base URL of the chat completions API
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for LexisConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            model: ModelSelector::default(),
            api_base: default_api_base(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl LexisConfig {
    /// Parse and validate TOML text
    ///
    /// # Errors
    /// `ConfigError::Parse` for malformed TOML, `ConfigError::InvalidValue`
    /// for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `LEXIS_*` overrides from the process environment
    ///
    /// # Errors
    /// `ConfigError::InvalidValue` if an override does not parse.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// # Errors
    /// `ConfigError::InvalidValue` if an override does not parse.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_ATTEMPTS) {
            self.max_attempts = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "max_attempts",
                reason: format!("{ENV_MAX_ATTEMPTS}={raw} is not a positive integer"),
            })?;
        }
        if let Some(model) = lookup(ENV_MODEL).filter(|m| !m.trim().is_empty()) {
            self.model = ModelSelector::new(model.trim());
        }
        if let Some(base) = lookup(ENV_API_BASE).filter(|b| !b.trim().is_empty()) {
            self.api_base = base.trim().to_string();
        }
        self.validate()?;
        Ok(self)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_attempts",
                reason: "must be at least 1".into(),
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "temperature",
                reason: format!("{} is outside 0.0..=2.0", self.temperature),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                reason: "must be at least 1".into(),
            });
        }
        if self.api_base.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_base",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// With attempt budget
    #[inline]
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// With model
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: ModelSelector) -> Self {
        self.model = model;
        self
    }

    /// With API base URL
    #[inline]
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// HTTP timeout as a duration
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// API key from the configured environment variable, if set and non-empty
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

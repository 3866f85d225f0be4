//! Runtime configuration.
//!
//! [`WizardConfig`] names the generation service endpoint and the defaults
//! a new workflow starts with. Load it from the environment with
//! [`WizardConfig::from_env`], or from YAML with the `yaml` feature.

use crate::{
    error::Result,
    types::{Language, Tone},
    WizardError,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the generation service base URL.
pub const ENV_API_URL: &str = "CONTENT_WIZARD_API_URL";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "CONTENT_WIZARD_TIMEOUT_SECS";
/// Environment variable holding the default tone id.
pub const ENV_TONE: &str = "CONTENT_WIZARD_TONE";
/// Environment variable holding the default language.
pub const ENV_LANGUAGE: &str = "CONTENT_WIZARD_LANGUAGE";

fn default_timeout_secs() -> u64 {
    60
}

/// Configuration for a wizard backed by the HTTP generation service.
///
/// # Example
///
/// ```
/// use content_wizard::WizardConfig;
///
/// let config = WizardConfig::new("http://localhost:8000");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Base URL of the generation service (e.g. `http://localhost:8000`).
    pub base_url: String,
    /// Round-trip timeout for one generation call. Default: 60.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Tone a new workflow starts with.
    #[serde(default)]
    pub tone: Tone,
    /// Language a new workflow starts with.
    #[serde(default)]
    pub language: Language,
}

impl WizardConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
            tone: Tone::default(),
            language: Language::default(),
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load from `CONTENT_WIZARD_*` environment variables.
    ///
    /// The API URL is required; the others fall back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup (environment, test map, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup(ENV_API_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| WizardError::InvalidConfig(format!("{} is not set", ENV_API_URL)))?;

        let mut config = Self::new(base_url.trim());

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                WizardError::InvalidConfig(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_TIMEOUT_SECS, raw
                ))
            })?;
        }
        if let Some(raw) = lookup(ENV_TONE) {
            config.tone = raw.parse()?;
        }
        if let Some(raw) = lookup(ENV_LANGUAGE) {
            config.language = raw.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document with the same shape as this struct.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| WizardError::InvalidConfig(format!("invalid YAML config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the base URL scheme and timeout.
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(WizardError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(WizardError::InvalidConfig(
                "timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

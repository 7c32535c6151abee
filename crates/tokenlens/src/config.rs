//! Configuration for token inspection.
//!
//! Loaded from a YAML file (usually `tokenlens.yaml`); every field has a
//! default, so an empty file or no file at all is valid.
//!
//! ```yaml
//! inspector:
//!   leeway_secs: 30
//! token_env: SESSION_TOKEN
//! log_filter: tokenlens=debug
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete tokenlens configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenlensConfig {
    /// Expiry check settings.
    #[serde(default)]
    pub inspector: InspectorConfig,

    /// Environment variable holding the raw token when none is passed explicitly.
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for TokenlensConfig {
    fn default() -> Self {
        Self {
            inspector: InspectorConfig::default(),
            token_env: default_token_env(),
            log_filter: default_log_filter(),
        }
    }
}

/// Settings for [`crate::TokenInspector`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InspectorConfig {
    /// Grace period added to `exp` before a token counts as expired.
    #[serde(default)]
    pub leeway_secs: u64,
}

fn default_token_env() -> String {
    "TOKENLENS_TOKEN".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TokenlensConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // serde_yaml reads an empty document as unit, not as an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.token_env.trim().is_empty() {
            return Err(ConfigError::Config("token_env must not be empty".to_string()));
        }
        if i64::try_from(self.inspector.leeway_secs).is_err() {
            return Err(ConfigError::Config(format!(
                "inspector.leeway_secs is out of range: {}",
                self.inspector.leeway_secs
            )));
        }
        Ok(())
    }

    /// Read the raw token from the configured environment variable.
    pub fn resolve_token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }
}

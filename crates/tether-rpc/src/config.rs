//! Client configuration.
//!
//! Stored as camelCase JSON:
//!
//! ```json
//! {
//!   "endpoint": "http://192.168.122.1:8080/sony/camera",
//!   "timeoutMs": 10000,
//!   "userAgent": "tether/0.3.0",
//!   "defaultVersion": "1.0"
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use tether_types::ApiVersion;

use crate::endpoint::Endpoint;
use crate::transport::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, TransportError};

const KNOWN_KEYS: [&str; 4] = ["endpoint", "timeoutMs", "userAgent", "defaultVersion"];

/// Errors raised while loading configuration or building a client
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No endpoint configured")]
    MissingEndpoint,

    #[error("Invalid endpoint {value:?}: {reason}")]
    InvalidEndpoint { value: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl ConfigError {
    pub(crate) fn invalid_endpoint(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Settings for [`crate::ApiClient::from_config`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Version used by the `by_method*` calls when none is given
    #[serde(default)]
    pub default_version: ApiVersion,
}

#[allow(clippy::cast_possible_truncation)] // 10 s fits in u64 milliseconds
fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            default_version: ApiVersion::default(),
        }
    }
}

impl ClientConfig {
    /// Load config from file, falling back to defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        warn_unknown_fields(&content, &path.display().to_string());
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The configured endpoint, validated.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEndpoint` when unset and
    /// `ConfigError::InvalidEndpoint` when it does not parse.
    pub fn endpoint(&self) -> Result<Endpoint, ConfigError> {
        self.endpoint
            .as_deref()
            .ok_or(ConfigError::MissingEndpoint)
            .and_then(Endpoint::parse)
    }
}

/// Warn about top-level keys this version does not understand.
fn warn_unknown_fields(content: &str, config_name: &str) {
    for key in unknown_keys(content) {
        warn!("Unknown config field in {config_name}: {key}");
    }
}

fn unknown_keys(content: &str) -> Vec<String> {
    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(content) else {
        return Vec::new();
    };

    let known: HashSet<&str> = KNOWN_KEYS.into_iter().collect();
    fields
        .keys()
        .filter(|key| !known.contains(key.as_str()))
        .cloned()
        .collect()
}

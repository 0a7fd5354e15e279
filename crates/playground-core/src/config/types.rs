//! Configuration type definitions for the playground
//!
//! Every section is optional in YAML; an empty file yields the public Judge0 CE
//! endpoint on RapidAPI and the 10 x 2 s poll schedule. The API key is normally
//! left out of the file and resolved from the environment by the loader.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::PlaygroundError;
use crate::poll::PollPolicy;

pub const DEFAULT_BASE_URL: &str = "https://judge0-ce.p.rapidapi.com";
pub const DEFAULT_HOST: &str = "judge0-ce.p.rapidapi.com";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaygroundConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Endpoint and credentials of the execution service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent as the `X-RapidAPI-Host` header
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Per-request timeout. Unset means requests are never cut short.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            host: default_host(),
            api_key: None,
            api_key_env: None,
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    #[serde(default)]
    pub max_interval_ms: Option<u64>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_interval_ms: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_host() -> String { DEFAULT_HOST.to_string() }
fn default_max_attempts() -> u32 { 10 }
fn default_interval_ms() -> u64 { 2000 }
fn default_backoff_multiplier() -> f64 { 1.0 }
fn default_log_level() -> String { "warn".to_string() }

impl PlaygroundConfig {
    pub fn validate(&self) -> Result<(), PlaygroundError> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(PlaygroundError::ConfigError("API base_url cannot be empty".to_string()));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(PlaygroundError::ConfigError(format!(
                "API base_url must start with http:// or https://, got '{}'",
                base_url
            )));
        }
        if self.api.host.trim().is_empty() {
            return Err(PlaygroundError::ConfigError("API host cannot be empty".to_string()));
        }

        if self.polling.max_attempts == 0 {
            return Err(PlaygroundError::ConfigError(
                "polling max_attempts must be greater than 0".to_string(),
            ));
        }
        let multiplier = self.polling.backoff_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(PlaygroundError::ConfigError(format!(
                "polling backoff_multiplier must be a finite number >= 1.0, got {}",
                multiplier
            )));
        }
        if let Some(max_interval_ms) = self.polling.max_interval_ms {
            if max_interval_ms < self.polling.interval_ms {
                return Err(PlaygroundError::ConfigError(
                    "polling max_interval_ms cannot be smaller than interval_ms".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// The resolved key, or an empty string. A missing key is not an error here:
    /// the service rejects the request and the run reports the HTTP status.
    pub fn api_key(&self) -> &str {
        self.api.api_key.as_deref().unwrap_or("")
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.api.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::from(&self.polling)
    }
}

//! Configuration loader for YAML files and environment resolution

use crate::config::types::*;
use crate::errors::PlaygroundError;
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Variables consulted, in order, when neither `api_key` nor `api_key_env` yields a key
pub const FALLBACK_KEY_VARS: &[&str] = &["JUDGE0_API_KEY", "RAPIDAPI_KEY"];

pub const DEFAULT_CONFIG_FILE: &str = "playground.yaml";

/// Configuration loader with environment resolution
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<PlaygroundConfig, PlaygroundError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).await.map_err(|e| {
            PlaygroundError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_str(content: &str) -> Result<PlaygroundConfig, PlaygroundError> {
        let mut config: PlaygroundConfig = if content.trim().is_empty() {
            PlaygroundConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| {
                PlaygroundError::ConfigError(format!("Failed to parse YAML config: {}", e))
            })?
        };

        Self::resolve_api_auth(&mut config.api);
        config.validate()?;

        Ok(config)
    }

    /// Defaults plus whatever key the environment provides
    pub fn from_env() -> Result<PlaygroundConfig, PlaygroundError> {
        Self::from_str("")
    }

    /// Use `explicit` when given, otherwise the first conventional location that
    /// exists, otherwise defaults.
    pub async fn load(explicit: Option<&Path>) -> Result<PlaygroundConfig, PlaygroundError> {
        if let Some(path) = explicit {
            return Self::from_file(path).await;
        }

        match Self::discover() {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::from_file(path).await
            }
            None => {
                log::debug!("No configuration file found, using defaults");
                Self::from_env()
            }
        }
    }

    /// `./playground.yaml`, then `<config dir>/playground/config.yaml`
    pub fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join("playground").join("config.yaml"))
            .filter(|path| path.exists())
    }

    fn resolve_api_auth(api: &mut ApiConfig) {
        if api.api_key.as_deref().map_or(false, |key| !key.is_empty()) {
            return;
        }

        if let Some(env_var) = &api.api_key_env {
            match env::var(env_var) {
                Ok(key) => {
                    api.api_key = Some(key);
                    return;
                }
                Err(_) => log::warn!("API key variable {} is not set", env_var),
            }
        }

        for var in FALLBACK_KEY_VARS {
            if let Ok(key) = env::var(var) {
                api.api_key = Some(key);
                return;
            }
        }

        log::warn!("No API key configured; requests will likely be rejected");
    }
}

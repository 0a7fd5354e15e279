//! Configuration for the playground
//!
//! Loaded once at startup and shared read-only afterwards. Supports YAML files
//! and pure-environment setups.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;


use crate::errors::PlaygroundError;
use std::path::Path;

/// Load a configuration from a YAML file
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<PlaygroundConfig, PlaygroundError> {
    ConfigLoader::from_file(path).await
}

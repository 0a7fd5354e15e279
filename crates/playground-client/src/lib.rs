//! Client SDK for the remote code-execution service
//!
//! The playground never compiles or runs code itself. Every run is delegated to a
//! Judge0-compatible HTTP API: the language catalog, the submission of a job and
//! the status checks that follow. This crate wraps those three calls behind the
//! [`ExecutionClient`] trait so the workflow in `playground-core` can be driven
//! either by the real HTTP client or by an in-memory fake.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub mod error;
pub mod http_client;
pub mod types;

pub use error::{ClientError, Result};
pub use http_client::HttpExecutionClient;
pub use types::*;

/// ExecutionClient trait for talking to a code-execution service
#[async_trait]
pub trait ExecutionClient: Send + Sync {
    /// Fetch every language the service can run
    async fn list_languages(&self) -> Result<Vec<LanguageDescriptor>>;

    /// Queue a job and return the token that identifies it
    async fn create_submission(&self, request: &ExecutionRequest) -> Result<SubmissionToken>;

    /// Read the current state of a queued job, output fields base64-encoded
    async fn get_submission(&self, token: &SubmissionToken) -> Result<ExecutionResult>;
}

/// Factory for creating ExecutionClient instances
pub struct ExecutionClientFactory;

impl ExecutionClientFactory {
    /// Create an HTTP client for a Judge0 deployment, optionally bounding each request
    pub fn create_http_client(
        base_url: impl Into<String>,
        host: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Arc<dyn ExecutionClient> {
        let client = HttpExecutionClient::new(base_url, host, api_key);
        match timeout {
            Some(timeout) => Arc::new(client.with_timeout(timeout)),
            None => Arc::new(client),
        }
    }
}

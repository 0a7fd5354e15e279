use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use std::time::Duration;

use crate::types::SubmissionCreated;
use crate::{
    ClientError, ExecutionClient, ExecutionRequest, ExecutionResult, LanguageDescriptor, Result,
    SubmissionToken,
};

pub const HOST_HEADER: &str = "X-RapidAPI-Host";
pub const KEY_HEADER: &str = "X-RapidAPI-Key";

/// HTTP client for a Judge0 deployment fronted by RapidAPI
pub struct HttpExecutionClient {
    base_url: String,
    host: String,
    api_key: String,
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpExecutionClient {
    pub fn new(
        base_url: impl Into<String>,
        host: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            host: host.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            timeout: None,
        }
    }

    /// Bound each request. Without this a hung connection is waited on indefinitely.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self
            .client
            .request(method, &url)
            .header(HOST_HEADER, &self.host)
            .header(KEY_HEADER, &self.api_key);

        match self.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            log::warn!("Execution service answered {} for {}", status, response.url());
            return Err(ClientError::HttpStatus(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl ExecutionClient for HttpExecutionClient {
    async fn list_languages(&self) -> Result<Vec<LanguageDescriptor>> {
        let response = self.request(Method::GET, "/languages").send().await?;
        let response = Self::ensure_success(response)?;

        let languages: Vec<LanguageDescriptor> = response.json().await?;
        log::debug!("Fetched {} languages", languages.len());
        Ok(languages)
    }

    async fn create_submission(&self, request: &ExecutionRequest) -> Result<SubmissionToken> {
        let response = self
            .request(Method::POST, "/submissions")
            .json(request)
            .send()
            .await?;
        let response = Self::ensure_success(response)?;

        let created: SubmissionCreated = response.json().await?;
        log::debug!("Submission queued with token {}", created.token);
        Ok(created.token)
    }

    async fn get_submission(&self, token: &SubmissionToken) -> Result<ExecutionResult> {
        let path = format!(
            "/submissions/{}?base64_encoded=true",
            urlencoding::encode(token.as_str())
        );
        let response = self.request(Method::GET, &path).send().await?;
        let response = Self::ensure_success(response)?;

        Ok(response.json().await?)
    }
}

//! Mock execution client for testing

use async_trait::async_trait;
use playground_client::{
    ClientError, ExecutionClient, ExecutionRequest, ExecutionResult, LanguageDescriptor,
    SubmissionToken,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::encode;

/// A scripted client: languages, one submission answer and a queue of poll answers.
///
/// Once the poll queue is drained every further poll reports status 1 (queued).
pub struct MockExecutionClient {
    languages: Result<Vec<LanguageDescriptor>, ClientError>,
    submission: Result<String, ClientError>,
    poll_responses: Mutex<VecDeque<Result<ExecutionResult, ClientError>>>,
    submit_delay: Option<Duration>,
    submitted: Mutex<Vec<ExecutionRequest>>,
    polled_tokens: Mutex<Vec<String>>,
    language_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    poll_calls: AtomicUsize,
}

impl MockExecutionClient {
    pub fn new() -> Self {
        Self {
            languages: Ok(Vec::new()),
            submission: Ok("mock-token".to_string()),
            poll_responses: Mutex::new(VecDeque::new()),
            submit_delay: None,
            submitted: Mutex::new(Vec::new()),
            polled_tokens: Mutex::new(Vec::new()),
            language_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            poll_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_languages(mut self, languages: Vec<LanguageDescriptor>) -> Self {
        self.languages = Ok(languages);
        self
    }

    pub fn with_language_error(mut self, error: ClientError) -> Self {
        self.languages = Err(error);
        self
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.submission = Ok(token.to_string());
        self
    }

    pub fn with_submit_error(mut self, error: ClientError) -> Self {
        self.submission = Err(error);
        self
    }

    /// Hold the submission call open for `delay`, so tests can observe an in-flight run
    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = Some(delay);
        self
    }

    pub fn with_poll_responses(self, responses: Vec<Result<ExecutionResult, ClientError>>) -> Self {
        *self.poll_responses.lock().unwrap() = VecDeque::from(responses);
        self
    }

    /// Poll answers carrying only the given status ids
    pub fn with_statuses(self, statuses: &[i64]) -> Self {
        let responses = statuses
            .iter()
            .map(|id| Ok(ExecutionResult::with_status(*id)))
            .collect();
        self.with_poll_responses(responses)
    }

    pub fn language_calls(&self) -> usize {
        self.language_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn poll_calls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<ExecutionRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn polled_tokens(&self) -> Vec<String> {
        self.polled_tokens.lock().unwrap().clone()
    }
}

impl Default for MockExecutionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionClient for MockExecutionClient {
    async fn list_languages(&self) -> Result<Vec<LanguageDescriptor>, ClientError> {
        self.language_calls.fetch_add(1, Ordering::SeqCst);
        self.languages.clone()
    }

    async fn create_submission(
        &self,
        request: &ExecutionRequest,
    ) -> Result<SubmissionToken, ClientError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(request.clone());

        if let Some(delay) = self.submit_delay {
            tokio::time::sleep(delay).await;
        }

        self.submission.clone().map(SubmissionToken::new)
    }

    async fn get_submission(&self, token: &SubmissionToken) -> Result<ExecutionResult, ClientError> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        self.polled_tokens
            .lock()
            .unwrap()
            .push(token.as_str().to_string());

        self.poll_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ExecutionResult::with_status(1)))
    }
}

/// A terminal result (status 3, "Accepted") with the given plain-text outputs base64-encoded
pub fn finished(
    stdout: Option<&str>,
    stderr: Option<&str>,
    compile_output: Option<&str>,
) -> ExecutionResult {
    let mut result = ExecutionResult::with_status(3);
    result.stdout = stdout.map(encode);
    result.stderr = stderr.map(encode);
    result.compile_output = compile_output.map(encode);
    result
}

//! Submit, poll and decode: the life of a single run
//!
//! A run is validated locally, submitted once, then polled on the schedule of a
//! [`PollPolicy`] until the service reports a status above the pending range or
//! the attempts run out. Polling stops at the first terminal answer. There is no
//! cancellation; a started run ends in success, failure or timeout.

use std::sync::Arc;

use playground_client::{
    ExecutionClient, ExecutionRequest, ExecutionResult, LanguageDescriptor, SubmissionToken,
};

use crate::errors::PlaygroundError;
use crate::output::render_result;
use crate::poll::PollPolicy;
use crate::trace::{LogTraceHandler, RunPhase, RunTraceHandler};

pub struct ExecutionWorkflow {
    client: Arc<dyn ExecutionClient>,
    policy: PollPolicy,
    trace_handler: Arc<dyn RunTraceHandler>,
}

impl ExecutionWorkflow {
    pub fn new(client: Arc<dyn ExecutionClient>) -> Self {
        Self {
            client,
            policy: PollPolicy::default(),
            trace_handler: Arc::new(LogTraceHandler),
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_trace_handler(mut self, handler: Arc<dyn RunTraceHandler>) -> Self {
        self.trace_handler = handler;
        self
    }

    pub fn client(&self) -> &dyn ExecutionClient {
        self.client.as_ref()
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Run and return the text for the output area, whether the run succeeded or not
    pub async fn run(
        &self,
        source_code: &str,
        stdin: &str,
        language: Option<&LanguageDescriptor>,
    ) -> String {
        match self.execute(source_code, stdin, language).await {
            Ok(output) => output,
            Err(e) => e.display_text(),
        }
    }

    pub async fn execute(
        &self,
        source_code: &str,
        stdin: &str,
        language: Option<&LanguageDescriptor>,
    ) -> Result<String, PlaygroundError> {
        let language = language.ok_or(PlaygroundError::NoLanguageSelected)?;
        if source_code.is_empty() {
            return Err(PlaygroundError::EmptySource);
        }

        let outcome = self.submit_and_wait(source_code, stdin, language).await;

        let phase = match &outcome {
            Ok(_) => RunPhase::Succeeded,
            Err(PlaygroundError::TimedOut) => RunPhase::TimedOut,
            Err(e) => RunPhase::Failed(e.to_string()),
        };
        self.trace_handler.on_phase(&phase);

        outcome
    }

    async fn submit_and_wait(
        &self,
        source_code: &str,
        stdin: &str,
        language: &LanguageDescriptor,
    ) -> Result<String, PlaygroundError> {
        self.trace_handler.on_phase(&RunPhase::Submitting);
        log::info!("Submitting {} bytes of {}", source_code.len(), language.name);

        let request = ExecutionRequest::new(language, source_code, stdin);
        let token = self.client.create_submission(&request).await?;

        let result = self.poll(token).await?;
        render_result(&result)
    }

    /// Consumes the token: one poll sequence per submission
    async fn poll(&self, token: SubmissionToken) -> Result<ExecutionResult, PlaygroundError> {
        for attempt in 0..self.policy.max_attempts {
            tokio::time::sleep(self.policy.delay_for(attempt)).await;
            self.trace_handler
                .on_phase(&RunPhase::Polling { attempt: attempt + 1 });

            let result = self.client.get_submission(&token).await?;
            if result.is_terminal() {
                log::debug!(
                    "Submission {} finished on attempt {} with status {} ({})",
                    token,
                    attempt + 1,
                    result.status.id,
                    result.status.description.as_deref().unwrap_or("no description")
                );
                return Ok(result);
            }

            log::debug!(
                "Submission {} still pending (status {}) after attempt {}",
                token,
                result.status.id,
                attempt + 1
            );
        }

        Err(PlaygroundError::TimedOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingTraceHandler;
    use playground_client::ClientError;
    use playground_test_mocks::{finished, MockExecutionClient};
    use std::time::Duration;
    use tokio::time::Instant;

    fn python() -> LanguageDescriptor {
        LanguageDescriptor::new(71, "Python (3.8.1)")
    }

    fn workflow_with(client: Arc<MockExecutionClient>) -> (ExecutionWorkflow, Arc<RecordingTraceHandler>) {
        let trace = Arc::new(RecordingTraceHandler::new());
        let workflow = ExecutionWorkflow::new(client).with_trace_handler(trace.clone());
        (workflow, trace)
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_language_issues_no_request() {
        let client = Arc::new(MockExecutionClient::new());
        let (workflow, trace) = workflow_with(client.clone());

        let text = workflow.run("print(1)", "", None).await;
        assert_eq!(text, "Please select a language first.");
        assert_eq!(client.submit_calls(), 0);
        assert_eq!(client.poll_calls(), 0);
        assert!(trace.phases().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_source_never_submits() {
        let client = Arc::new(MockExecutionClient::new());
        let (workflow, _) = workflow_with(client.clone());

        let text = workflow.run("", "input", Some(&python())).await;
        assert_eq!(text, "Error: Your Code is Empty , Type Something and then try");
        assert_eq!(client.submit_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_http_error_skips_polling() {
        let client = Arc::new(
            MockExecutionClient::new().with_submit_error(ClientError::HttpStatus(401)),
        );
        let (workflow, trace) = workflow_with(client.clone());

        let text = workflow.run("print(1)", "", Some(&python())).await;
        assert_eq!(text, "Error: HTTP error! status: 401");
        assert_eq!(client.poll_calls(), 0);
        assert_eq!(
            trace.phases(),
            vec![
                RunPhase::Submitting,
                RunPhase::Failed("HTTP error! status: 401".to_string())
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_after_ten_delayed_polls() {
        let client = Arc::new(MockExecutionClient::new().with_statuses(&[1; 10]));
        let (workflow, trace) = workflow_with(client.clone());

        let started = Instant::now();
        let text = workflow.run("print(1)", "", Some(&python())).await;

        assert_eq!(text, "Error: Timed out waiting for code execution");
        assert_eq!(client.poll_calls(), 10);
        assert_eq!(started.elapsed(), Duration::from_secs(20));

        let phases = trace.phases();
        assert_eq!(phases.first(), Some(&RunPhase::Submitting));
        assert_eq!(phases[10], RunPhase::Polling { attempt: 10 });
        assert_eq!(phases.last(), Some(&RunPhase::TimedOut));
        assert_eq!(phases.len(), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_at_first_terminal_status() {
        let client = Arc::new(
            MockExecutionClient::new()
                .with_token("tok-3")
                .with_poll_responses(vec![
                    Ok(ExecutionResult::with_status(1)),
                    Ok(ExecutionResult::with_status(2)),
                    Ok(finished(Some("Hello"), None, None)),
                    Ok(finished(Some("never read"), None, None)),
                ]),
        );
        let (workflow, trace) = workflow_with(client.clone());

        let started = Instant::now();
        let text = workflow.run("print('Hello')", "", Some(&python())).await;

        assert_eq!(text, "Hello");
        assert_eq!(client.poll_calls(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(6));
        assert_eq!(client.polled_tokens(), vec!["tok-3"; 3]);
        assert_eq!(trace.phases().last(), Some(&RunPhase::Succeeded));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_http_error_aborts() {
        let client = Arc::new(MockExecutionClient::new().with_poll_responses(vec![
            Ok(ExecutionResult::with_status(1)),
            Err(ClientError::HttpStatus(500)),
        ]));
        let (workflow, _) = workflow_with(client.clone());

        let result = workflow.execute("print(1)", "", Some(&python())).await;
        assert_eq!(
            result,
            Err(PlaygroundError::Client(ClientError::HttpStatus(500)))
        );
        assert_eq!(client.poll_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_outputs_are_rendered() {
        let cases = [
            (finished(None, Some("boom"), None), "Error: boom"),
            (finished(None, None, Some("syntax error")), "Compilation Error: syntax error"),
            (finished(None, None, None), "No output generated."),
        ];

        for (result, expected) in cases {
            let client = Arc::new(MockExecutionClient::new().with_poll_responses(vec![Ok(result)]));
            let (workflow, _) = workflow_with(client);
            assert_eq!(workflow.run("x", "", Some(&python())).await, expected);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_any_status_above_two_is_terminal() {
        // 11 is "Runtime Error (NZEC)"; no output fields at all
        let client = Arc::new(
            MockExecutionClient::new().with_poll_responses(vec![Ok(ExecutionResult::with_status(11))]),
        );
        let (workflow, _) = workflow_with(client.clone());

        assert_eq!(
            workflow.run("x", "", Some(&python())).await,
            "No output generated."
        );
        assert_eq!(client.poll_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_carries_language_and_stdin() {
        let client = Arc::new(
            MockExecutionClient::new()
                .with_poll_responses(vec![Ok(finished(Some("4"), None, None))]),
        );
        let (workflow, _) = workflow_with(client.clone());

        workflow
            .run("print(int(input()) * 2)", "2", Some(&python()))
            .await;

        let submitted = client.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].language_id, 71);
        assert_eq!(submitted[0].source_code, "print(int(input()) * 2)");
        assert_eq!(submitted[0].stdin, "2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_policy_with_backoff() {
        let client = Arc::new(MockExecutionClient::new().with_statuses(&[1, 1, 1]));
        let (workflow, _) = workflow_with(client.clone());
        let workflow = workflow.with_policy(
            PollPolicy::fixed(3, Duration::from_millis(100)).with_backoff(2.0, None),
        );

        let started = Instant::now();
        let result = workflow.execute("x", "", Some(&python())).await;

        assert_eq!(result, Err(PlaygroundError::TimedOut));
        assert_eq!(started.elapsed(), Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_output_fails_the_run() {
        let mut result = finished(None, None, None);
        result.stdout = Some("%%%".to_string());
        let client = Arc::new(MockExecutionClient::new().with_poll_responses(vec![Ok(result)]));
        let (workflow, trace) = workflow_with(client);

        let text = workflow.run("x", "", Some(&python())).await;
        assert!(text.starts_with("Error: Failed to decode output"));
        assert!(matches!(trace.phases().last(), Some(RunPhase::Failed(_))));
    }
}

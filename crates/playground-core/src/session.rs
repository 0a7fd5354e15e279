//! The playground page state and its single-run guard

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use playground_client::LanguageDescriptor;

use crate::catalog::LanguageCatalog;
use crate::errors::PlaygroundError;
use crate::workflow::ExecutionWorkflow;

pub const CATALOG_UNAVAILABLE_MESSAGE: &str = "Error fetching languages. Please try again later.";

#[derive(Debug, Default)]
struct PageState {
    code: String,
    stdin: String,
    output: String,
    selected: Option<LanguageDescriptor>,
}

/// Clears the busy flag when the run that set it ends, however it ends
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// One playground session: catalog, inputs, output and the busy flag.
///
/// The catalog is fetched once, in [`Playground::start`]. `run` takes `&self`
/// so a session can be shared; a run started while another is in flight is
/// rejected without touching the output of the first.
pub struct Playground {
    workflow: ExecutionWorkflow,
    catalog: LanguageCatalog,
    catalog_available: bool,
    state: Mutex<PageState>,
    busy: AtomicBool,
}

impl Playground {
    pub async fn start(workflow: ExecutionWorkflow) -> Self {
        let mut state = PageState::default();

        let (catalog, catalog_available) = match LanguageCatalog::load(workflow.client()).await {
            Ok(catalog) => {
                state.selected = catalog.default_language().cloned();
                (catalog, true)
            }
            Err(e) => {
                log::error!("Error fetching languages: {}", e);
                state.output = CATALOG_UNAVAILABLE_MESSAGE.to_string();
                (LanguageCatalog::default(), false)
            }
        };

        Self {
            workflow,
            catalog,
            catalog_available,
            state: Mutex::new(state),
            busy: AtomicBool::new(false),
        }
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    /// False when the startup languages request failed
    pub fn catalog_available(&self) -> bool {
        self.catalog_available
    }

    pub fn selected_language(&self) -> Option<LanguageDescriptor> {
        self.with_state(|state| state.selected.clone())
    }

    /// Select by id or name. An unknown language keeps the current selection.
    pub fn select_language(&self, query: &str) -> Result<LanguageDescriptor, PlaygroundError> {
        let language = self.catalog.resolve(query)?.clone();
        self.with_state(|state| state.selected = Some(language.clone()));
        Ok(language)
    }

    pub fn set_code(&self, code: impl Into<String>) {
        let code = code.into();
        self.with_state(|state| state.code = code);
    }

    pub fn set_stdin(&self, stdin: impl Into<String>) {
        let stdin = stdin.into();
        self.with_state(|state| state.stdin = stdin);
    }

    pub fn code(&self) -> String {
        self.with_state(|state| state.code.clone())
    }

    pub fn stdin(&self) -> String {
        self.with_state(|state| state.stdin.clone())
    }

    pub fn output(&self) -> String {
        self.with_state(|state| state.output.clone())
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Run the current code with the current input and selection.
    ///
    /// Returns the text now in the output area, or the rejection message when
    /// another run holds the session.
    pub async fn run(&self) -> String {
        match self.try_run().await {
            Ok(output) => output,
            Err(e) => e.display_text(),
        }
    }

    /// Like [`Playground::run`], keeping the error. The output area still
    /// receives the display text of a failed run.
    pub async fn try_run(&self) -> Result<String, PlaygroundError> {
        let (code, stdin, selected) =
            self.with_state(|state| (state.code.clone(), state.stdin.clone(), state.selected.clone()));

        if selected.is_none() {
            let err = PlaygroundError::NoLanguageSelected;
            self.set_output(err.display_text());
            return Err(err);
        }

        let _guard = match BusyGuard::acquire(&self.busy) {
            Some(guard) => guard,
            None => {
                log::warn!("Rejected a run while another is in progress");
                return Err(PlaygroundError::Busy);
            }
        };

        self.set_output(String::new());
        let outcome = self.workflow.execute(&code, &stdin, selected.as_ref()).await;
        let text = match &outcome {
            Ok(output) => output.clone(),
            Err(e) => e.display_text(),
        };
        self.set_output(text);
        outcome
    }

    fn set_output(&self, output: String) {
        self.with_state(|state| state.output = output);
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut PageState) -> R) -> R {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_client::ClientError;
    use playground_test_mocks::{finished, MockExecutionClient};
    use std::sync::Arc;
    use std::time::Duration;

    fn languages() -> Vec<LanguageDescriptor> {
        vec![
            LanguageDescriptor::new(2, "Python"),
            LanguageDescriptor::new(1, "C"),
        ]
    }

    async fn playground_with(client: Arc<MockExecutionClient>) -> Playground {
        Playground::start(ExecutionWorkflow::new(client)).await
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_selects_first_language_by_name() {
        let client = Arc::new(MockExecutionClient::new().with_languages(languages()));
        let playground = playground_with(client.clone()).await;

        let names: Vec<_> = playground
            .catalog()
            .languages()
            .iter()
            .map(|l| l.name.clone())
            .collect();
        assert_eq!(names, vec!["C", "Python"]);
        assert_eq!(playground.selected_language().unwrap().name, "C");
        assert_eq!(playground.output(), "");
        assert_eq!(client.language_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_catalog_failure_leaves_nothing_selected() {
        let client = Arc::new(
            MockExecutionClient::new().with_language_error(ClientError::HttpStatus(500)),
        );
        let playground = playground_with(client.clone()).await;

        assert!(playground.catalog().is_empty());
        assert!(!playground.catalog_available());
        assert!(playground.selected_language().is_none());
        assert_eq!(playground.output(), CATALOG_UNAVAILABLE_MESSAGE);

        playground.set_code("print(1)");
        assert_eq!(playground.run().await, "Please select a language first.");
        assert_eq!(playground.output(), "Please select a language first.");
        assert_eq!(client.submit_calls(), 0);
        assert_eq!(client.language_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_uses_session_inputs() {
        let client = Arc::new(
            MockExecutionClient::new()
                .with_languages(languages())
                .with_poll_responses(vec![Ok(finished(Some("42\n"), None, None))]),
        );
        let playground = playground_with(client.clone()).await;
        playground.select_language("python").unwrap();
        playground.set_code("print(input())");
        playground.set_stdin("42");

        assert_eq!(playground.code(), "print(input())");
        assert_eq!(playground.stdin(), "42");
        assert_eq!(playground.run().await, "42\n");
        assert_eq!(playground.output(), "42\n");
        assert!(!playground.is_busy());

        let submitted = client.submitted();
        assert_eq!(submitted[0].language_id, 2);
        assert_eq!(submitted[0].stdin, "42");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_language_keeps_selection() {
        let client = Arc::new(MockExecutionClient::new().with_languages(languages()));
        let playground = playground_with(client).await;

        assert!(matches!(
            playground.select_language("Brainfuck"),
            Err(PlaygroundError::UnknownLanguage(_))
        ));
        assert_eq!(playground.selected_language().unwrap().name, "C");
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_run_is_rejected() {
        let client = Arc::new(
            MockExecutionClient::new()
                .with_languages(languages())
                .with_submit_delay(Duration::from_secs(1))
                .with_poll_responses(vec![Ok(finished(Some("first"), None, None))]),
        );
        let playground = Arc::new(playground_with(client.clone()).await);
        playground.set_code("print('first')");

        let first = {
            let playground = playground.clone();
            async move { playground.run().await }
        };
        let second = {
            let playground = playground.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                let busy_during_run = playground.is_busy();
                (busy_during_run, playground.run().await)
            }
        };

        let (first_text, (busy_during_run, second_text)) = tokio::join!(first, second);

        assert!(busy_during_run);
        assert_eq!(second_text, "Error: A run is already in progress");
        assert_eq!(first_text, "first");
        assert_eq!(playground.output(), "first");
        assert_eq!(client.submit_calls(), 1);
        assert!(!playground.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_output_replaced_by_error() {
        let client = Arc::new(
            MockExecutionClient::new()
                .with_languages(languages())
                .with_submit_error(ClientError::HttpStatus(429)),
        );
        let playground = playground_with(client).await;
        playground.set_code("int main() { return 0; }");

        assert_eq!(playground.run().await, "Error: HTTP error! status: 429");
        assert_eq!(playground.output(), "Error: HTTP error! status: 429");
        assert!(!playground.is_busy());
    }
}

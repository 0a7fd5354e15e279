use serde::{Deserialize, Serialize};

/// Highest status id the service uses for jobs that are still queued or running.
/// Anything above it is a final outcome, whatever that outcome is.
pub const LAST_PENDING_STATUS_ID: i64 = 2;

/// A compiler or interpreter offered by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageDescriptor {
    pub id: i64,
    pub name: String,
}

impl LanguageDescriptor {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Body of a submission request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub language_id: i64,
    pub source_code: String,
    pub stdin: String,
}

impl ExecutionRequest {
    pub fn new(
        language: &LanguageDescriptor,
        source_code: impl Into<String>,
        stdin: impl Into<String>,
    ) -> Self {
        Self {
            language_id: language.id,
            source_code: source_code.into(),
            stdin: stdin.into(),
        }
    }
}

/// Opaque handle for a queued job.
///
/// Not `Clone`: a token is moved into the one poll loop that consumes it.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionToken(String);

impl SubmissionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubmissionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Response of the submission endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionCreated {
    pub token: SubmissionToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionStatus {
    pub id: i64,
    #[serde(default)]
    pub description: Option<String>,
}

impl SubmissionStatus {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            description: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.id > LAST_PENDING_STATUS_ID
    }
}

/// Snapshot of a job as returned by the status endpoint.
///
/// The text fields are base64 as sent by the service; decoding is left to the
/// caller so a malformed payload surfaces where the output is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub status: SubmissionStatus,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub compile_output: Option<String>,
}

impl ExecutionResult {
    pub fn with_status(status_id: i64) -> Self {
        Self {
            status: SubmissionStatus::new(status_id),
            stdout: None,
            stderr: None,
            compile_output: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_threshold() {
        assert!(!SubmissionStatus::new(1).is_terminal());
        assert!(!SubmissionStatus::new(2).is_terminal());
        assert!(SubmissionStatus::new(3).is_terminal());
        assert!(SubmissionStatus::new(11).is_terminal());
    }

    #[test]
    fn test_result_with_missing_and_null_fields() {
        let result: ExecutionResult = serde_json::from_value(json!({
            "status": { "id": 3, "description": "Accepted" },
            "stdout": "SGVsbG8=",
            "stderr": null
        }))
        .unwrap();

        assert_eq!(result.status.description.as_deref(), Some("Accepted"));
        assert_eq!(result.stdout.as_deref(), Some("SGVsbG8="));
        assert!(result.stderr.is_none());
        assert!(result.compile_output.is_none());
    }

    #[test]
    fn test_request_body_field_names() {
        let language = LanguageDescriptor::new(71, "Python (3.8.1)");
        let body = serde_json::to_value(ExecutionRequest::new(&language, "print(1)", "")).unwrap();
        assert_eq!(
            body,
            json!({ "language_id": 71, "source_code": "print(1)", "stdin": "" })
        );
    }

    #[test]
    fn test_token_is_transparent() {
        let created: SubmissionCreated =
            serde_json::from_value(json!({ "token": "d85cd024-1548-4165-96c7-7bc88673f194" }))
                .unwrap();
        assert_eq!(created.token.as_str(), "d85cd024-1548-4165-96c7-7bc88673f194");
    }
}

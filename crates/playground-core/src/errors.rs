//! Error types for a playground run
//!
//! Every failure ends the current run and is shown to the user in place of the
//! program output, so each variant's message is written for that audience.
//! [`PlaygroundError::display_text`] produces the exact text for the output area.

use playground_client::ClientError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaygroundError {
    #[error("Please select a language first.")]
    NoLanguageSelected,
    #[error("Your Code is Empty , Type Something and then try")]
    EmptySource,
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),
    #[error("A run is already in progress")]
    Busy,
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("Timed out waiting for code execution")]
    TimedOut,
    #[error("Failed to decode output: {0}")]
    Decode(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("I/O error: {0}")]
    IoError(String),
}

impl PlaygroundError {
    /// Text shown in the output area when a run ends with this error
    pub fn display_text(&self) -> String {
        match self {
            PlaygroundError::NoLanguageSelected => self.to_string(),
            _ => format!("Error: {}", self),
        }
    }
}

impl From<std::io::Error> for PlaygroundError {
    fn from(err: std::io::Error) -> Self {
        PlaygroundError::IoError(err.to_string())
    }
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The service answered with a non-success status code
    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Invalid response body: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::HttpStatus(status.as_u16())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

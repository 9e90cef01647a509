use thiserror::Error;

/// Failure of a single backend request.
///
/// Carries rendered messages instead of the underlying `reqwest::Error` so the
/// value can be cloned into GUI messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("could not reach the backend: {0}")]
    Transport(String),

    #[error("the backend did not answer in time")]
    Timeout,

    #[error("the backend rejected the request ({status})")]
    Rejected { status: u16 },

    #[error("the backend sent an unreadable response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else if err.is_decode() {
            BackendError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            BackendError::Rejected { status: status.as_u16() }
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Malformed(err.to_string())
    }
}

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    /// The request could not be built (e.g. a header value with invalid
    /// characters).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The backend could not be reached: connection refused, DNS failure
    /// or timeout.
    #[error("Connection error: {0}")]
    Connection(String),
    /// The request to the backend failed or the body could not be read.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The backend rejected the request with 401.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// The request returns a non-OK status code other than 401
    #[error("Status error: {1} (Status {0})")]
    StatusCode(reqwest::StatusCode, String),
    /// The response body did not have the expected shape.
    #[error("Unexpected response from {0}: {1}")]
    Invariant(String, String),
}

pub type PortalResult<T> = Result<T, PortalError>;

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

impl PortalError {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Whether the backend host itself was unreachable, as opposed to it
    /// answering with an error.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Transport(_))
    }

    /// The `detail` field of a JSON error body, if the backend sent one.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        let body = match self {
            Self::Unauthorized(body) | Self::StatusCode(_, body) => body,
            _ => return None,
        };
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        match parsed.detail? {
            serde_json::Value::String(detail) => Some(detail),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

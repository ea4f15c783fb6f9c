use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`crate::RequestClient`] operations
#[derive(Debug, Error)]
pub enum Error {
    /// Network-level failure reported by the transport
    #[error("Request failed: {0}")]
    Transport(String),

    /// `fetch_file` received a non-success status
    #[error("file load error (status {status})")]
    FileLoad { status: u16 },

    /// Malformed JSON response, or params that cannot be represented as JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured timeout elapsed before the request settled
    #[error("timeout {}", .0.as_millis())]
    Timeout(Duration),

    #[error("cannot encode {body} body as '{content_type}'")]
    Encoding {
        content_type: String,
        body: &'static str,
    },

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            log::debug!("Transport reported its own timeout: {}", err);
        }
        Error::Transport(err.to_string())
    }
}

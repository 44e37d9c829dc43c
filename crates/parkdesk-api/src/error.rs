use thiserror::Error;

/// Errors returned by the record-store client.
#[derive(Debug, Error)]
pub enum Error {
    /// The API key was rejected (HTTP 401).
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// The key is valid but row-level policy denied the request (HTTP 403).
    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    /// Any other non-success response from the store.
    #[error("record store error (HTTP {status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The response body did not match the expected record shape.
    #[error("failed to decode response: {message}")]
    Deserialization { message: String, body: String },

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Whether the underlying transport gave up waiting for the store.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Whether the store could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }
}

use thiserror::Error;

/// Failure talking to the control plane.
///
/// Transient variants are retried by [`crate::with_retries`]; everything
/// else surfaces immediately.
#[derive(Debug, Clone, Error)]
pub enum CloudError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request throttled by control plane: {0}")]
    Throttled(String),

    #[error("control plane rejected request: {code}: {message}")]
    Api { code: String, message: String },

    #[error("invalid control plane response: {0}")]
    InvalidResponse(String),
}

impl CloudError {
    /// Connectivity-level errors worth retrying with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(self, CloudError::Transport(_) | CloudError::Throttled(_))
    }
}

impl From<reqwest::Error> for CloudError {
    fn from(e: reqwest::Error) -> Self {
        CloudError::Transport(e.to_string())
    }
}

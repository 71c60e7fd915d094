//! RPC error types.

use thiserror::Error;

/// Error type for node RPC calls.
#[derive(Debug, Error)]
pub enum RpcError {
    /// HTTP/network error from reqwest
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error object
    #[error("Node error {code}: {message}")]
    Node { code: i64, message: String },

    /// Server-side error (5xx)
    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    /// Unexpected HTTP status code
    #[error("Unexpected status {0}: {1}")]
    UnexpectedStatus(u16, String),

    /// JSON deserialization error
    #[error("Deserialization error: {0}")]
    Deserialize(String),

    /// Too many requests (429)
    #[error("Rate limited")]
    RateLimited,

    /// Invalid transport configuration
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Every retry attempt failed
    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// Result type alias for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;

impl RpcError {
    /// The node-side message, if this error came from the node.
    pub fn node_message(&self) -> Option<&str> {
        match self {
            RpcError::Node { message, .. } => Some(message),
            _ => None,
        }
    }
}

//! Error type shared by [`RemoteAdapter`](crate::RemoteAdapter) implementations.

use thiserror::Error;

/// Failure reported by a remote adapter.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The service rejected the request as unauthenticated.
    #[error("remote service rejected the credentials: {0}")]
    Unauthorized(String),

    /// The service answered with a non-success status.
    #[error("remote service returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Body or reason phrase accompanying the status.
        message: String,
    },

    /// The request never completed.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the credentials
    #[error("wrong credentials for user '{0}'")]
    WrongCredentials(String),

    /// WebSocket connection error
    #[error("connection error: {0}")]
    Connection(String),

    /// HTTP transport error
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("malformed server response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// Channel id is not in the directory
    #[error("unknown channel '{0}'")]
    UnknownChannel(String),

    /// The server answered with a rejecting state
    #[error("server rejected request: {0}")]
    Rejected(String),
}

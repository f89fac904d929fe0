//! Error types for the order API client

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the order API
///
/// HTTP error statuses are not represented here: responses are handed back to
/// the caller whatever their status.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or its body could not be read
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not have the expected shape
    #[error("failed to deserialize response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The server URL could not be parsed
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A download would be written outside its destination directory
    #[error("refusing to write '{0}' outside the destination directory")]
    InvalidFileName(String),

    /// A downloaded file could not be written
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Destination that failed
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// Check if this error means the API could not be reached
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this error is a malformed API payload
    pub fn is_deserialization(&self) -> bool {
        matches!(self, Self::Deserialization(_))
    }
}

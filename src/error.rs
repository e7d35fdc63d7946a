//! Error types for the client.

use thiserror::Error;

/// Failures a sync operation can run into. None of these are fatal; the
/// operations catch them and surface a notice instead of propagating.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Network-level failure reaching the service
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered outside the 2xx range
    #[error("unexpected status from service: {0}")]
    Status(reqwest::StatusCode),

    /// The response body did not have the expected shape
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Another operation already holds the in-flight slot
    #[error("an operation is already in flight")]
    Busy,
}

pub type Result<T> = std::result::Result<T, ChatError>;

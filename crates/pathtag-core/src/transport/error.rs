//! Transport error type.

use thiserror::Error;

/// Failure to complete a request/response exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// libcurl reported an error (bad URL, connect failure, timeout, ...).
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    /// The blocking transfer task panicked or was cancelled.
    #[error("transport task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

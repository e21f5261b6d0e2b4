//! Cluster client errors

use thiserror::Error;

/// Errors that can occur when interacting with the cluster management API
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClusterError {
    /// Connection or transport level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The API rejected the request
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP-equivalent status code reported by the API
        status: u16,
        /// Error message reported by the API
        message: String,
    },

    /// Resource not found (404-equivalent)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request (e.g., malformed search expression)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClusterError {
    /// Returns `true` when the error is the 404-equivalent "not found" outcome
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

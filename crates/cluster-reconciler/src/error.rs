//! Reconciler error types.
//!
//! Remote failures keep the originating [`ClusterError`] as their source so
//! callers can still tell a missing cluster from a transport failure.

use crate::poll::PollOperation;
use clusters_client::ClusterError;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by the lifecycle reconciler.
#[derive(Debug, Error)]
pub enum ReconcilerError {
    /// The desired state cannot be turned into a cluster
    #[error("Can't build cluster: {0}")]
    Validation(String),

    /// The requested version is older than the supported minimum
    #[error("Version '{version}' is not supported, minimum supported version is {minimum}")]
    UnsupportedVersion { version: String, minimum: String },

    /// The requested change violates the update policy
    #[error("Invalid update: {0}")]
    InvalidUpdate(String),

    /// The remote system rejected the new cluster
    #[error("Can't create cluster with name '{name}': {source}")]
    Create { name: String, source: ClusterError },

    /// Fetching the cluster failed; `is_not_found()` tells a removed cluster
    #[error("Can't find cluster with identifier '{id}': {source}")]
    Read { id: String, source: ClusterError },

    /// The remote system rejected the patch
    #[error("Can't update cluster with identifier '{id}': {source}")]
    Update { id: String, source: ClusterError },

    /// The remote system rejected the deletion
    #[error("Can't delete cluster with identifier '{id}': {source}")]
    Delete { id: String, source: ClusterError },

    /// A lookup search failed
    #[error("Can't list clusters: {source}")]
    List { source: ClusterError },

    /// A fetch failed while waiting for the cluster to converge
    #[error("Can't poll {operation} of cluster with identifier '{id}': {source}")]
    Poll {
        id: String,
        operation: PollOperation,
        source: ClusterError,
    },

    /// The cluster did not converge before the deadline
    #[error("Timed out after {timeout:?} waiting for {operation} of cluster with identifier '{id}'")]
    TimedOut {
        id: String,
        operation: PollOperation,
        timeout: Duration,
    },

    /// The caller cancelled the operation
    #[error("Operation '{operation}' was cancelled")]
    Cancelled { operation: &'static str },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ReconcilerError {
    /// `true` when the remote system reported that the cluster does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Read { source, .. }
            | Self::Update { source, .. }
            | Self::Delete { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// `true` when the operation stopped because the caller cancelled it
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

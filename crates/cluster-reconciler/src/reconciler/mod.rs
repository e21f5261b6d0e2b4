//! Lifecycle reconciliation of remote clusters.
//!
//! Each operation is a single logical call driven by the caller:
//! - `create`: build, create, optionally wait for `ready`, populate
//! - `read` / `import`: fetch and populate
//! - `update`: minimal patch, populate
//! - `delete`: delete, optionally wait for removal
//! - `lookup`: search by name or id
//!
//! Every operation takes a `CancellationToken`; cancelling it interrupts
//! remote calls and poll sleeps and surfaces as `ReconcilerError::Cancelled`.

mod create;
mod delete;
mod lookup;
mod read;
mod update;

#[cfg(test)]
mod create_test;

use crate::config::ReconcilerConfig;
use crate::error::ReconcilerError;
use crate::mapper::StateMapper;
use crate::poll::{PollOperation, PollOutcome, Poller};
use crate::state::ObservedState;
use crate::thumbprint::{ThumbprintResolver, TlsThumbprintResolver};
use crate::version_gate::VersionGate;
use clusters_client::ClusterClientTrait;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// Reconciles declarative cluster state against the remote system.
pub struct Reconciler {
    pub(crate) client: Arc<dyn ClusterClientTrait>,
    pub(crate) mapper: StateMapper,
    pub(crate) ready_poller: Poller,
    pub(crate) removal_poller: Poller,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("mapper", &self.mapper)
            .field("ready_poller", &self.ready_poller)
            .field("removal_poller", &self.removal_poller)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    /// Create a reconciler that resolves OIDC thumbprints over TLS
    ///
    /// # Errors
    ///
    /// Returns `ReconcilerError::InvalidConfig` if `config` is invalid or the
    /// TLS client can't be set up.
    pub fn new(
        client: impl ClusterClientTrait + 'static,
        config: ReconcilerConfig,
    ) -> Result<Self, ReconcilerError> {
        let resolver = TlsThumbprintResolver::new(config.thumbprint_timeout)
            .map_err(|e| ReconcilerError::InvalidConfig(e.to_string()))?;
        Self::with_resolver(client, config, Arc::new(resolver))
    }

    /// Create a reconciler with a custom thumbprint resolver
    ///
    /// # Errors
    ///
    /// Returns `ReconcilerError::InvalidConfig` if `config` is invalid.
    pub fn with_resolver(
        client: impl ClusterClientTrait + 'static,
        config: ReconcilerConfig,
        resolver: Arc<dyn ThumbprintResolver>,
    ) -> Result<Self, ReconcilerError> {
        config.validate()?;
        let version_gate = VersionGate::new(&config.min_version)
            .map_err(|e| ReconcilerError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            mapper: StateMapper::new(version_gate, resolver),
            ready_poller: Poller::new(PollOperation::Readiness, config.ready_poll),
            removal_poller: Poller::new(PollOperation::Removal, config.removal_poll),
        })
    }

    /// Mapper used to translate between declarative state and clusters
    #[must_use]
    pub fn mapper(&self) -> &StateMapper {
        &self.mapper
    }
}

/// Run `future` unless `cancel` fires first
pub(crate) async fn cancellable<F: Future>(
    cancel: &CancellationToken,
    operation: &'static str,
    future: F,
) -> Result<F::Output, ReconcilerError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            warn!("Operation '{}' cancelled", operation);
            Err(ReconcilerError::Cancelled { operation })
        }
        output = future => Ok(output),
    }
}

/// Identifier of an observed cluster, required for every call on an existing one
pub(crate) fn cluster_id(state: &ObservedState) -> Result<&str, ReconcilerError> {
    match state.id.as_deref() {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(ReconcilerError::Validation(
            "cluster identifier is required".to_string(),
        )),
    }
}

/// Turn a poll outcome into the reconciler's error taxonomy
pub(crate) fn finish_poll<T>(
    poller: &Poller,
    id: &str,
    outcome: PollOutcome<T>,
) -> Result<Option<T>, ReconcilerError> {
    let operation = poller.operation();
    match outcome {
        PollOutcome::Converged(value) => Ok(value),
        PollOutcome::TimedOut => {
            let timeout = poller.settings().timeout;
            error!(
                "Cluster {} did not reach {} within {:?}",
                id, operation, timeout
            );
            Err(ReconcilerError::TimedOut {
                id: id.to_string(),
                operation,
                timeout,
            })
        }
        PollOutcome::Failed(source) => {
            error!("Failed to poll {} of cluster {}: {}", operation, id, source);
            Err(ReconcilerError::Poll {
                id: id.to_string(),
                operation,
                source,
            })
        }
        PollOutcome::Cancelled => {
            warn!("Waiting for {} of cluster {} cancelled", operation, id);
            Err(ReconcilerError::Cancelled {
                operation: match operation {
                    PollOperation::Readiness => "wait for readiness",
                    PollOperation::Removal => "wait for removal",
                },
            })
        }
    }
}

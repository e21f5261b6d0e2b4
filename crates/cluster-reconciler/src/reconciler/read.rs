//! Refresh and import observed state

use super::{Reconciler, cancellable, cluster_id};
use crate::error::ReconcilerError;
use crate::state::ObservedState;
use clusters_client::Cluster;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

impl Reconciler {
    /// Refresh `current` from the remote system
    ///
    /// Values only the caller knows (e.g. the operator role prefix) are kept.
    ///
    /// # Errors
    ///
    /// - `Validation` if `current` has no identifier
    /// - `Read` if the fetch fails; use `is_not_found()` to tell a cluster
    ///   removed out of band
    /// - `Cancelled` if `cancel` fires
    pub async fn read(
        &self,
        current: &ObservedState,
        cancel: &CancellationToken,
    ) -> Result<ObservedState, ReconcilerError> {
        let id = cluster_id(current)?;
        debug!("Reading cluster {}", id);

        let object = self.fetch(id, "read", cancel).await?;
        let mut state = current.clone();
        self.mapper.populate(&object, &mut state, cancel).await?;
        Ok(state)
    }

    /// Build observed state for an existing cluster that was not created here
    ///
    /// # Errors
    ///
    /// Same as [`Reconciler::read`].
    pub async fn import(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<ObservedState, ReconcilerError> {
        if id.trim().is_empty() {
            return Err(ReconcilerError::Validation(
                "cluster identifier is required".to_string(),
            ));
        }
        info!("Importing cluster {}", id);

        let object = self.fetch(id, "import", cancel).await?;
        let mut state = ObservedState::default();
        self.mapper.populate(&object, &mut state, cancel).await?;
        Ok(state)
    }

    async fn fetch(
        &self,
        id: &str,
        operation: &'static str,
        cancel: &CancellationToken,
    ) -> Result<Cluster, ReconcilerError> {
        cancellable(cancel, operation, self.client.get(id))
            .await?
            .map_err(|source| {
                if source.is_not_found() {
                    warn!("Cluster {} not found", id);
                } else {
                    warn!("Failed to fetch cluster {}: {}", id, source);
                }
                ReconcilerError::Read {
                    id: id.to_string(),
                    source,
                }
            })
    }
}

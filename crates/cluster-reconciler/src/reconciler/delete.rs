//! Delete a cluster and wait for it to disappear

use super::{Reconciler, cancellable, finish_poll};
use crate::error::ReconcilerError;
use clusters_client::{Cluster, ClusterError};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

impl Reconciler {
    /// Delete cluster `id`; with `should_poll`, wait until the remote system
    /// no longer finds it
    ///
    /// # Errors
    ///
    /// - `Delete` if the remote system rejects the deletion
    /// - `Poll` if a fetch fails with anything but "not found"
    /// - `TimedOut` if the cluster is still found at the removal deadline
    /// - `Cancelled` if `cancel` fires
    pub async fn delete(
        &self,
        id: &str,
        should_poll: bool,
        cancel: &CancellationToken,
    ) -> Result<(), ReconcilerError> {
        info!("Deleting cluster {}", id);
        cancellable(cancel, "delete", self.client.delete(id))
            .await?
            .map_err(|source| {
                error!("Failed to delete cluster {}: {}", id, source);
                ReconcilerError::Delete {
                    id: id.to_string(),
                    source,
                }
            })?;

        if !should_poll {
            info!("Deletion of cluster {} accepted, not waiting for removal", id);
            return Ok(());
        }

        info!(
            "Waiting up to {:?} for cluster {} to be removed",
            self.removal_poller.settings().timeout,
            id
        );
        let client = self.client.as_ref();
        let outcome = self
            .removal_poller
            .poll(
                id,
                cancel,
                move || client.get(id),
                |result: &Result<Cluster, ClusterError>| {
                    matches!(result, Err(e) if e.is_not_found())
                },
            )
            .await;
        finish_poll(&self.removal_poller, id, outcome)?;

        info!("Cluster {} removed", id);
        Ok(())
    }
}

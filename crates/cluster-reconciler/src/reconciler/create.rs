//! Create a cluster and wait for it to become ready

use super::{Reconciler, cancellable, finish_poll};
use crate::error::ReconcilerError;
use crate::state::{DesiredState, ObservedState};
use clusters_client::{Cluster, ClusterError, ClusterState};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

impl Reconciler {
    /// Create the cluster described by `desired`
    ///
    /// Unless `desired.wait` is `Some(false)`, waits until the cluster
    /// reports `ready`. The returned state is populated from the most recent
    /// object seen. Nothing is rolled back when waiting fails.
    ///
    /// # Errors
    ///
    /// - `Validation` / `UnsupportedVersion` if the cluster can't be built; no
    ///   remote call is made
    /// - `Create` if the remote system rejects the cluster
    /// - `Poll` / `TimedOut` if waiting for readiness fails
    /// - `Cancelled` if `cancel` fires
    pub async fn create(
        &self,
        desired: &DesiredState,
        cancel: &CancellationToken,
    ) -> Result<ObservedState, ReconcilerError> {
        let cluster = self.mapper.build(desired)?;
        let name = cluster.name().to_string();

        info!("Creating cluster '{}'", name);
        let created = cancellable(cancel, "create", self.client.create(&cluster))
            .await?
            .map_err(|source| {
                error!("Failed to create cluster '{}': {}", name, source);
                ReconcilerError::Create {
                    name: name.clone(),
                    source,
                }
            })?;
        info!(
            "Created cluster '{}' with id {} (state: {})",
            name,
            created.id(),
            created.state()
        );

        let latest = if !desired.should_wait() {
            info!("Not waiting for cluster {} to become ready", created.id());
            created
        } else if created.state() == ClusterState::Ready {
            created
        } else {
            self.wait_until_ready(created, cancel).await?
        };

        let mut state = ObservedState::from_desired(desired);
        self.mapper.populate(&latest, &mut state, cancel).await?;
        Ok(state)
    }

    /// Poll `created` until it reports `ready`; returns the ready object
    async fn wait_until_ready(
        &self,
        created: Cluster,
        cancel: &CancellationToken,
    ) -> Result<Cluster, ReconcilerError> {
        let id = created.id().to_string();
        let settings = self.ready_poller.settings();
        info!(
            "Waiting up to {:?} for cluster {} to become ready",
            settings.timeout, id
        );

        let client = self.client.as_ref();
        let cluster_id = id.as_str();
        let outcome = self
            .ready_poller
            .poll(
                cluster_id,
                cancel,
                move || client.get(cluster_id),
                |result: &Result<Cluster, ClusterError>| {
                    matches!(result, Ok(cluster) if cluster.state() == ClusterState::Ready)
                },
            )
            .await;

        let ready = finish_poll(&self.ready_poller, &id, outcome)?;
        info!("Cluster {} is ready", id);
        Ok(ready.unwrap_or(created))
    }
}

//! Update a cluster with a minimal patch
//!
//! Some cluster fields can't change after creation, so the patch carries only
//! what actually differs:
//!
//! - the compute node count, when the desired count is set and differs;
//!   a count and autoscaling are mutually exclusive
//! - the autoscaling bounds, on every update while autoscaling is enabled
//! - properties and proxy settings, when set and different

use super::{Reconciler, cancellable, cluster_id};
use crate::error::ReconcilerError;
use crate::mapper::{autoscaling_builder, proxy_builder};
use crate::state::{DesiredState, ObservedState};
use clusters_client::{Cluster, ClusterBuilder, ClusterNodesBuilder};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

impl Reconciler {
    /// Apply the differences between `current` and `desired`
    ///
    /// The update is sent even when nothing changed. On success the returned
    /// state is refreshed from the response, then `autoscaling_enabled` and
    /// `compute_nodes` are taken verbatim from `desired`.
    ///
    /// # Errors
    ///
    /// - `Validation` if `current` has no identifier
    /// - `InvalidUpdate` if the autoscaling settings are inconsistent; no
    ///   remote call is made
    /// - `Update` if the remote system rejects the patch
    /// - `Cancelled` if `cancel` fires
    pub async fn update(
        &self,
        current: &ObservedState,
        desired: &DesiredState,
        cancel: &CancellationToken,
    ) -> Result<ObservedState, ReconcilerError> {
        let id = cluster_id(current)?;
        let patch = build_patch(current, desired)?;

        info!("Updating cluster {}", id);
        let updated = cancellable(cancel, "update", self.client.update(id, &patch))
            .await?
            .map_err(|source| {
                error!("Failed to update cluster {}: {}", id, source);
                ReconcilerError::Update {
                    id: id.to_string(),
                    source,
                }
            })?;

        let mut state = current.clone();
        self.mapper.populate(&updated, &mut state, cancel).await?;
        state.autoscaling_enabled = desired.autoscaling_enabled;
        state.compute_nodes = desired.compute_nodes;

        info!("Updated cluster {} (state: {})", id, updated.state());
        Ok(state)
    }
}

/// Build the patch taking `current` to `desired`
///
/// # Errors
///
/// Returns `ReconcilerError::InvalidUpdate` when replica bounds are set
/// without autoscaling, when autoscaling is combined with a node count, or
/// when the bounds are inverted.
pub(crate) fn build_patch(
    current: &ObservedState,
    desired: &DesiredState,
) -> Result<Cluster, ReconcilerError> {
    let mut nodes = ClusterNodesBuilder::new();

    if desired.autoscaling_enabled == Some(true) {
        if let Some(compute) = desired.compute_nodes {
            return Err(ReconcilerError::InvalidUpdate(format!(
                "Compute nodes can't be set to {compute} while autoscaling is enabled"
            )));
        }
        if let (Some(min), Some(max)) = (desired.min_replicas, desired.max_replicas) {
            if min > max {
                return Err(ReconcilerError::InvalidUpdate(format!(
                    "Min replicas ({min}) can't be greater than max replicas ({max})"
                )));
            }
        }
        nodes = nodes.autoscale_compute(autoscaling_builder(
            desired.min_replicas,
            desired.max_replicas,
        ));
    } else {
        if desired.min_replicas.is_some() || desired.max_replicas.is_some() {
            return Err(ReconcilerError::InvalidUpdate(
                "Autoscaling must be enabled in order to set min and max replicas".to_string(),
            ));
        }
        if let Some(compute) = changed(&current.compute_nodes, &desired.compute_nodes) {
            nodes = nodes.compute(compute);
        }
    }

    let mut builder = ClusterBuilder::new();
    if !nodes.is_empty() {
        builder = builder.nodes(nodes);
    }
    if let Some(properties) = changed(&current.properties, &desired.properties) {
        builder = builder.properties(properties);
    }
    if let Some(proxy) = changed(&current.proxy, &desired.proxy) {
        let proxy = proxy_builder(&proxy);
        if !proxy.is_empty() {
            builder = builder.proxy(proxy);
        }
    }

    if builder.is_empty() {
        debug!("No changes to send for cluster {:?}", current.id);
    }
    Ok(builder.build())
}

/// Desired value when it is set and differs from the current one
fn changed<T: PartialEq + Clone>(current: &Option<T>, desired: &Option<T>) -> Option<T> {
    match desired {
        Some(value) if current.as_ref() != Some(value) => Some(value.clone()),
        _ => None,
    }
}

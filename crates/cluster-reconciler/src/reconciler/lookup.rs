//! Look up an existing cluster by name or identifier

use super::{Reconciler, cancellable};
use crate::error::ReconcilerError;
use crate::state::{ClusterLookup, ClusterSummary};
use clusters_client::ObjectReference;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

impl ClusterLookup {
    /// Search expression understood by the cluster service
    fn search(&self) -> Result<String, ReconcilerError> {
        let (field, value) = match self {
            Self::Name(name) => ("name", name),
            Self::Id(id) => ("id", id),
        };
        if value.trim().is_empty() {
            return Err(ReconcilerError::Validation(format!(
                "lookup {field} can't be empty"
            )));
        }
        if value.contains('\'') {
            return Err(ReconcilerError::Validation(format!(
                "lookup {field} can't contain quotes"
            )));
        }
        Ok(format!("{field} is '{value}'"))
    }
}

impl Reconciler {
    /// Find a cluster by name or identifier
    ///
    /// When several clusters match, the last one listed wins. The version is
    /// the raw OpenShift version when the service reports one, otherwise the
    /// version identifier.
    ///
    /// # Errors
    ///
    /// - `Validation` if the key is empty
    /// - `List` if the search fails
    /// - `Cancelled` if `cancel` fires
    pub async fn lookup(
        &self,
        key: &ClusterLookup,
        cancel: &CancellationToken,
    ) -> Result<Option<ClusterSummary>, ReconcilerError> {
        let search = key.search()?;
        debug!("Looking up cluster with {}", search);

        let clusters = cancellable(cancel, "lookup", self.client.list(&search))
            .await?
            .map_err(|source| {
                error!("Failed to list clusters with {}: {}", search, source);
                ReconcilerError::List { source }
            })?;

        let Some(cluster) = clusters.last() else {
            debug!("No cluster matches {}", search);
            return Ok(None);
        };

        let version = cluster
            .get_openshift_version()
            .or_else(|| cluster.get_version().and_then(ObjectReference::get_id))
            .map(str::to_string);
        Ok(Some(ClusterSummary {
            id: cluster.id().to_string(),
            name: cluster.name().to_string(),
            state: cluster.state().to_string(),
            version,
        }))
    }
}

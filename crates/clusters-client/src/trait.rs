//! ClusterClient trait for mocking
//!
//! This trait abstracts the remote cluster management API so the reconciler can
//! be driven by a real client or by `MockClusterClient` in unit tests.

use crate::error::ClusterError;
use crate::models::Cluster;

/// Trait for remote cluster API operations
///
/// Implementations must be stateless with respect to individual clusters and
/// safe to share across tasks. A missing cluster must be reported as
/// [`ClusterError::NotFound`] so that removal polling can tell it apart from
/// transport failures.
#[async_trait::async_trait]
pub trait ClusterClientTrait: Send + Sync {
    /// Fetch a cluster by identifier
    async fn get(&self, id: &str) -> Result<Cluster, ClusterError>;

    /// Submit a new cluster and return the object as accepted by the API
    async fn create(&self, cluster: &Cluster) -> Result<Cluster, ClusterError>;

    /// Apply a partial update; only fields present on `patch` are changed
    async fn update(&self, id: &str, patch: &Cluster) -> Result<Cluster, ClusterError>;

    /// Request deletion of a cluster
    async fn delete(&self, id: &str) -> Result<(), ClusterError>;

    /// List clusters matching a search expression such as `name is 'my-cluster'`
    async fn list(&self, search: &str) -> Result<Vec<Cluster>, ClusterError>;
}

//! Cluster lifecycle reconciler
//!
//! Drives managed clusters through their lifecycle against a remote cluster
//! management service. Callers own the declarative records:
//! [`DesiredState`] describes what they want, [`ObservedState`] what the
//! remote system reports. The [`Reconciler`] turns one into the other:
//!
//! - **create**: build the cluster, create it, wait until it is `ready`
//! - **read** / **import**: refresh observed state from the remote object
//! - **update**: send a minimal patch (node count, autoscaling bounds)
//! - **delete**: delete, wait until the cluster is gone
//! - **lookup**: find a cluster by name or identifier
//!
//! STS clusters additionally get the SHA-1 thumbprint of their OIDC
//! provider's root CA, read from a TLS handshake.
//!
//! # Example
//!
//! ```no_run
//! use cluster_reconciler::{DesiredState, Reconciler, ReconcilerConfig, ReconcilerError};
//! use clusters_client::ClusterClientTrait;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(client: impl ClusterClientTrait + 'static) -> Result<(), ReconcilerError> {
//! let reconciler = Reconciler::new(client, ReconcilerConfig::from_env()?)?;
//! let desired = DesiredState {
//!     name: Some("my-cluster".to_string()),
//!     cloud_provider: Some("aws".to_string()),
//!     product: Some("rosa".to_string()),
//!     cloud_region: Some("us-west-1".to_string()),
//!     ..Default::default()
//! };
//!
//! let cancel = CancellationToken::new();
//! let observed = reconciler.create(&desired, &cancel).await?;
//! println!("cluster {:?} is {:?}", observed.id, observed.state);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod mapper;
pub mod poll;
pub mod reconciler;
pub mod state;
pub mod thumbprint;
pub mod version_gate;

#[cfg(test)]
mod test_utils;

pub use config::{PollSettings, ReconcilerConfig};
pub use error::ReconcilerError;
pub use mapper::StateMapper;
pub use poll::{PollOperation, PollOutcome, Poller};
pub use reconciler::Reconciler;
pub use state::{
    ClusterLookup, ClusterSummary, DesiredState, InstanceIamRoleSettings, ObservedState,
    ProxySettings, StsSettings,
};
pub use thumbprint::{ThumbprintError, ThumbprintResolver, TlsThumbprintResolver};
pub use version_gate::{VersionError, VersionGate};

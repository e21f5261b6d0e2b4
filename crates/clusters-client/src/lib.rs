//! Cluster management API client seam
//!
//! Domain model and client trait for the remote cluster management service.
//! The reconciler talks to the remote control plane exclusively through
//! [`ClusterClientTrait`]; transport and payload encoding are owned by the
//! implementor.
//!
//! # Example
//!
//! ```no_run
//! use clusters_client::{ClusterBuilder, ClusterClientTrait, ClusterError};
//!
//! # async fn example(client: &dyn ClusterClientTrait) -> Result<(), ClusterError> {
//! let cluster = ClusterBuilder::new()
//!     .name("my-cluster")
//!     .cloud_provider("aws")
//!     .product("rosa")
//!     .region("us-east-1")
//!     .build();
//!
//! let created = client.create(&cluster).await?;
//! let fetched = client.get(created.id()).await?;
//! println!("cluster {} is {}", fetched.name(), fetched.state());
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Presence-aware model**: every optional field has a `get_*` accessor that
//!   distinguishes "absent" from "empty"
//! - **Immutable builders**: nested builders report `is_empty()` so callers can
//!   avoid attaching vacant structures
//! - **Mocking**: `MockClusterClient` behind the `test-util` feature

pub mod builder;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod cluster_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use builder::*;
pub use cluster_trait::ClusterClientTrait;
pub use error::ClusterError;
pub use models::*;
#[cfg(feature = "test-util")]
pub use mock::{MockCall, MockClusterClient, MockOperation};

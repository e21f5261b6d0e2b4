//! State mapper
//!
//! Translates between the caller's declarative records and the remote
//! [`Cluster`](clusters_client::Cluster) model:
//!
//! - **build**: `DesiredState` → `Cluster`, materializing only the fields the
//!   caller provided
//! - **populate**: `Cluster` → `ObservedState`, assigning every field from
//!   the remote object and resolving the OIDC thumbprint of STS clusters

mod build;
mod populate;


pub(crate) use build::{autoscaling_builder, proxy_builder};

use crate::thumbprint::ThumbprintResolver;
use crate::version_gate::VersionGate;
use std::sync::Arc;

/// Bidirectional mapper between declarative state and the remote model
#[derive(Clone)]
pub struct StateMapper {
    version_gate: VersionGate,
    resolver: Arc<dyn ThumbprintResolver>,
}

impl std::fmt::Debug for StateMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMapper")
            .field("version_gate", &self.version_gate)
            .finish_non_exhaustive()
    }
}

impl StateMapper {
    #[must_use]
    pub fn new(version_gate: VersionGate, resolver: Arc<dyn ThumbprintResolver>) -> Self {
        Self {
            version_gate,
            resolver,
        }
    }

    #[must_use]
    pub fn version_gate(&self) -> &VersionGate {
        &self.version_gate
    }
}

//! Test utilities for unit testing the mapper and the reconciler
//!
//! This module provides fixtures and a scripted thumbprint resolver.

use crate::config::{PollSettings, ReconcilerConfig};
use crate::mapper::StateMapper;
use crate::reconciler::Reconciler;
use crate::state::{DesiredState, InstanceIamRoleSettings, StsSettings};
use crate::thumbprint::{ThumbprintError, ThumbprintResolver};
use crate::version_gate::VersionGate;
use async_trait::async_trait;
use clusters_client::MockClusterClient;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BASE_DOMAIN: &str = "example.com";
pub const THUMBPRINT: &str = "9e99a48a9960b14926bb7f3b02e22da2b0ab7280";

/// Thumbprint resolver returning a fixed answer and recording requests
#[derive(Debug, Clone, Default)]
pub struct StaticThumbprintResolver {
    thumbprint: Option<String>,
    pending: bool,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StaticThumbprintResolver {
    /// Resolve every endpoint to `thumbprint`
    pub fn returning(thumbprint: &str) -> Self {
        Self {
            thumbprint: Some(thumbprint.to_string()),
            ..Self::default()
        }
    }

    /// Fail every resolution
    pub fn failing() -> Self {
        Self::default()
    }

    /// Never finish resolving
    pub fn pending() -> Self {
        Self {
            pending: true,
            ..Self::default()
        }
    }

    /// Endpoints requested so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ThumbprintResolver for StaticThumbprintResolver {
    async fn resolve(&self, endpoint_url: &str) -> Result<String, ThumbprintError> {
        self.requests.lock().unwrap().push(endpoint_url.to_string());
        if self.pending {
            std::future::pending::<()>().await;
        }
        self.thumbprint.clone().ok_or(ThumbprintError::EmptyChain)
    }
}

/// Route logs to the test output; `RUST_LOG` selects the level
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Default configuration with the production poll timings
pub fn test_config() -> ReconcilerConfig {
    ReconcilerConfig::default()
}

/// Configuration with short poll timings
pub fn fast_config() -> ReconcilerConfig {
    ReconcilerConfig {
        ready_poll: PollSettings::new(Duration::from_secs(1), Duration::from_secs(10)),
        removal_poll: PollSettings::new(Duration::from_secs(1), Duration::from_secs(5)),
        ..ReconcilerConfig::default()
    }
}

pub fn create_test_mapper(resolver: StaticThumbprintResolver) -> StateMapper {
    StateMapper::new(
        VersionGate::new(&test_config().min_version).unwrap(),
        Arc::new(resolver),
    )
}

pub fn create_test_reconciler(
    client: MockClusterClient,
    resolver: StaticThumbprintResolver,
    config: ReconcilerConfig,
) -> Reconciler {
    Reconciler::with_resolver(client, config, Arc::new(resolver)).unwrap()
}

/// Minimal valid desired state of a non-STS cluster
pub fn create_test_desired_state(name: &str) -> DesiredState {
    DesiredState {
        name: Some(name.to_string()),
        cloud_provider: Some("aws".to_string()),
        product: Some("rosa".to_string()),
        cloud_region: Some("us-east-1".to_string()),
        ..Default::default()
    }
}

/// STS role configuration with every field a caller can set
pub fn create_test_sts_settings() -> StsSettings {
    StsSettings {
        role_arn: Some("arn:aws:iam::123456789012:role/Installer".to_string()),
        support_role_arn: Some("arn:aws:iam::123456789012:role/Support".to_string()),
        instance_iam_roles: Some(InstanceIamRoleSettings {
            master_role_arn: Some("arn:aws:iam::123456789012:role/ControlPlane".to_string()),
            worker_role_arn: Some("arn:aws:iam::123456789012:role/Worker".to_string()),
        }),
        operator_role_prefix: Some("my-prefix".to_string()),
        oidc_endpoint_url: None,
        thumbprint: None,
    }
}

//! Mock ClusterClient for unit testing
//!
//! This module provides a mock implementation of `ClusterClientTrait` that can be
//! used in unit tests without a running cluster management service.
//!
//! The mock keeps clusters in memory, records every call, and can be scripted:
//! - `push_get_response` queues responses for `get` (consumed before the store)
//! - `fail_on` makes an operation fail until `clear_failure` is called
//! - `set_create_state` controls the state reported by `create`
//! - `keep_on_delete` leaves clusters in the store after `delete`

mod helpers;

use crate::error::ClusterError;
use crate::models::*;
use crate::cluster_trait::ClusterClientTrait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tracing::debug;

pub use helpers::{merge_patch, parse_search};

/// Operation kinds of the mock, used for failure injection and call counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    /// `get`
    Get,
    /// `create`
    Create,
    /// `update`
    Update,
    /// `delete`
    Delete,
    /// `list`
    List,
}

/// A recorded call against the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    /// `get(id)`
    Get(String),
    /// `create(cluster)`
    Create(Cluster),
    /// `update(id, patch)`
    Update(String, Cluster),
    /// `delete(id)`
    Delete(String),
    /// `list(search)`
    List(String),
}

impl MockCall {
    fn operation(&self) -> MockOperation {
        match self {
            Self::Get(_) => MockOperation::Get,
            Self::Create(_) => MockOperation::Create,
            Self::Update(..) => MockOperation::Update,
            Self::Delete(_) => MockOperation::Delete,
            Self::List(_) => MockOperation::List,
        }
    }
}

/// Mock ClusterClient for testing
///
/// This mock stores clusters in memory and can be configured to return
/// specific responses for testing different scenarios.
#[derive(Debug, Clone)]
pub struct MockClusterClient {
    pub(crate) base_domain: String,
    pub(crate) clusters: Arc<Mutex<HashMap<String, Cluster>>>,
    pub(crate) get_responses: Arc<Mutex<HashMap<String, VecDeque<Result<Cluster, ClusterError>>>>>,
    pub(crate) failures: Arc<Mutex<HashMap<MockOperation, ClusterError>>>,
    pub(crate) calls: Arc<Mutex<Vec<MockCall>>>,
    pub(crate) create_state: Arc<Mutex<ClusterState>>,
    pub(crate) keep_on_delete: Arc<Mutex<bool>>,
    // Counter for generating IDs
    pub(crate) next_id: Arc<Mutex<u64>>,
}

impl MockClusterClient {
    /// Create a new mock client; created clusters get DNS names under `base_domain`
    pub fn new(base_domain: impl Into<String>) -> Self {
        Self {
            base_domain: base_domain.into(),
            clusters: Arc::new(Mutex::new(HashMap::new())),
            get_responses: Arc::new(Mutex::new(HashMap::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            create_state: Arc::new(Mutex::new(ClusterState::Pending)),
            keep_on_delete: Arc::new(Mutex::new(false)),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Add a cluster to the mock store (for test setup)
    pub fn add_cluster(&self, cluster: Cluster) {
        self.clusters.lock().unwrap().insert(cluster.id().to_string(), cluster);
    }

    /// Get a cluster from the mock store without recording a call
    pub fn stored_cluster(&self, id: &str) -> Option<Cluster> {
        self.clusters.lock().unwrap().get(id).cloned()
    }

    /// Change the state of a stored cluster
    pub fn set_state(&self, id: &str, state: ClusterState) {
        if let Some(cluster) = self.clusters.lock().unwrap().get_mut(id) {
            cluster.state = Some(state);
        }
    }

    /// Queue a response for the next `get(id)`; queued responses are consumed in order
    pub fn push_get_response(&self, id: &str, response: Result<Cluster, ClusterError>) {
        self.get_responses
            .lock()
            .unwrap()
            .entry(id.to_string())
            .or_default()
            .push_back(response);
    }

    /// Queue `get(id)` responses reporting the stored cluster in each of `states`
    pub fn push_get_states(&self, id: &str, states: &[ClusterState]) {
        let base = self.stored_cluster(id).unwrap_or_default();
        for state in states {
            let mut cluster = base.clone();
            cluster.state = Some(*state);
            self.push_get_response(id, Ok(cluster));
        }
    }

    /// Make every call of `operation` fail with `error`
    pub fn fail_on(&self, operation: MockOperation, error: ClusterError) {
        self.failures.lock().unwrap().insert(operation, error);
    }

    /// Remove an injected failure
    pub fn clear_failure(&self, operation: MockOperation) {
        self.failures.lock().unwrap().remove(&operation);
    }

    /// State reported by `create` for new clusters (default `pending`)
    pub fn set_create_state(&self, state: ClusterState) {
        *self.create_state.lock().unwrap() = state;
    }

    /// Keep clusters in the store after `delete` (simulates slow removal)
    pub fn keep_on_delete(&self, keep: bool) {
        *self.keep_on_delete.lock().unwrap() = keep;
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls of `operation`
    pub fn call_count(&self, operation: MockOperation) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    /// Patches sent through `update`, in order
    pub fn update_patches(&self) -> Vec<Cluster> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                MockCall::Update(_, patch) => Some(patch.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: MockCall) -> Result<(), ClusterError> {
        let operation = call.operation();
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(&operation) {
            Some(error) => {
                debug!("Mock: injected failure for {:?}: {}", operation, error);
                Err(error.clone())
            }
            None => Ok(()),
        }
    }

    /// Generate next ID
    pub(crate) fn next_id(&self) -> String {
        let mut id = self.next_id.lock().unwrap();
        let current = *id;
        *id += 1;
        format!("{current:020}")
    }
}

#[async_trait::async_trait]
impl ClusterClientTrait for MockClusterClient {
    async fn get(&self, id: &str) -> Result<Cluster, ClusterError> {
        debug!("Mock: fetching cluster {}", id);
        self.record(MockCall::Get(id.to_string()))?;

        let scripted = self
            .get_responses
            .lock()
            .unwrap()
            .get_mut(id)
            .and_then(VecDeque::pop_front);
        if let Some(response) = scripted {
            return response;
        }

        self.clusters
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| ClusterError::NotFound(format!("Cluster '{id}' not found")))
    }

    async fn create(&self, cluster: &Cluster) -> Result<Cluster, ClusterError> {
        debug!("Mock: creating cluster '{}'", cluster.name());
        self.record(MockCall::Create(cluster.clone()))?;

        let name = cluster.name().to_string();
        let duplicate = self
            .clusters
            .lock()
            .unwrap()
            .values()
            .any(|existing| existing.name() == name);
        if duplicate {
            return Err(ClusterError::Api {
                status: 400,
                message: format!("Cluster name '{name}' already exists"),
            });
        }

        let id = self.next_id();
        let state = *self.create_state.lock().unwrap();
        let created = helpers::accept_new_cluster(cluster, &id, &self.base_domain, state);
        self.clusters.lock().unwrap().insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: &str, patch: &Cluster) -> Result<Cluster, ClusterError> {
        debug!("Mock: updating cluster {}", id);
        self.record(MockCall::Update(id.to_string(), patch.clone()))?;

        let mut clusters = self.clusters.lock().unwrap();
        let existing = clusters
            .get(id)
            .ok_or_else(|| ClusterError::NotFound(format!("Cluster '{id}' not found")))?;
        let updated = merge_patch(existing, patch);
        clusters.insert(id.to_string(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), ClusterError> {
        debug!("Mock: deleting cluster {}", id);
        self.record(MockCall::Delete(id.to_string()))?;

        let mut clusters = self.clusters.lock().unwrap();
        if !clusters.contains_key(id) {
            return Err(ClusterError::NotFound(format!("Cluster '{id}' not found")));
        }
        if *self.keep_on_delete.lock().unwrap() {
            if let Some(cluster) = clusters.get_mut(id) {
                cluster.state = Some(ClusterState::Uninstalling);
            }
        } else {
            clusters.remove(id);
        }
        Ok(())
    }

    async fn list(&self, search: &str) -> Result<Vec<Cluster>, ClusterError> {
        debug!("Mock: listing clusters with {}", search);
        self.record(MockCall::List(search.to_string()))?;

        let (field, value) = parse_search(search)?;
        let mut matches: Vec<Cluster> = self
            .clusters
            .lock()
            .unwrap()
            .values()
            .filter(|cluster| match field.as_str() {
                "id" => cluster.id() == value,
                _ => cluster.name() == value,
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(matches)
    }
}

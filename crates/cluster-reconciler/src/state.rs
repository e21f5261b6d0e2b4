//! Declarative state records
//!
//! `DesiredState` is what the caller asks for; `ObservedState` is what the
//! remote system reports back, plus the values it computes. Both are plain
//! records owned by the caller: this crate never persists them.
//!
//! Every optional field is an `Option`. `None` means "not provided / not
//! returned" and is never conflated with an empty value: `Some(String::new())`
//! and `Some(vec![])` are concrete values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Instance profile roles of an STS cluster
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceIamRoleSettings {
    /// Instance profile role of the control plane nodes
    pub master_role_arn: Option<String>,
    /// Instance profile role of the compute nodes
    pub worker_role_arn: Option<String>,
}

/// STS role configuration
///
/// `oidc_endpoint_url` and `thumbprint` are computed by the remote system and
/// ignored when building a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StsSettings {
    /// Installer role assumed by the remote system
    pub role_arn: Option<String>,
    /// Role used by the provider's support team
    pub support_role_arn: Option<String>,
    /// Instance profile roles
    pub instance_iam_roles: Option<InstanceIamRoleSettings>,
    /// Prefix of the operator role names; generated remotely when unset
    pub operator_role_prefix: Option<String>,
    /// OIDC provider endpoint, without the `https://` scheme (computed)
    pub oidc_endpoint_url: Option<String>,
    /// SHA-1 thumbprint of the OIDC provider's root CA (computed); empty when
    /// it could not be resolved
    pub thumbprint: Option<String>,
}

/// Cluster-wide proxy settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Proxy for plain HTTP traffic
    pub http_proxy: Option<String>,
    /// Proxy for HTTPS traffic
    pub https_proxy: Option<String>,
    /// Comma separated destinations that bypass the proxy
    pub no_proxy: Option<String>,
}

/// Desired cluster configuration supplied by the caller for create/update
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DesiredState {
    /// Cluster name
    pub name: Option<String>,
    /// Cloud provider, e.g. `aws`
    pub cloud_provider: Option<String>,
    /// Product, e.g. `rosa` or `osd`
    pub product: Option<String>,
    /// Cloud region, e.g. `us-east-1`
    pub cloud_region: Option<String>,
    /// Spread nodes over several availability zones
    pub multi_az: Option<bool>,
    /// User defined properties
    pub properties: Option<BTreeMap<String, String>>,
    /// Run on the customer's own cloud account
    pub ccs_enabled: Option<bool>,
    /// Encrypt etcd data
    pub etcd_encryption: Option<bool>,
    /// Number of compute nodes; exclusive with autoscaling
    pub compute_nodes: Option<i64>,
    /// Instance type of the compute nodes
    pub compute_machine_type: Option<String>,
    /// Availability zones of the nodes
    pub availability_zones: Option<Vec<String>>,
    /// Scale the compute nodes between `min_replicas` and `max_replicas`
    pub autoscaling_enabled: Option<bool>,
    /// Lower autoscaling bound
    pub min_replicas: Option<i64>,
    /// Upper autoscaling bound
    pub max_replicas: Option<i64>,
    /// AWS account the cluster runs in; never echoed back by the remote system
    pub aws_account_id: Option<String>,
    /// Access key of the simple credentials
    pub aws_access_key_id: Option<String>,
    /// Secret key of the simple credentials
    pub aws_secret_access_key: Option<String>,
    /// Existing subnets to install into
    pub aws_subnet_ids: Option<Vec<String>>,
    /// Expose the API through AWS PrivateLink only
    pub aws_private_link: Option<bool>,
    /// STS role configuration; exclusive with the simple credentials
    pub sts: Option<StsSettings>,
    /// CIDR of the node network
    pub machine_cidr: Option<String>,
    /// CIDR of the service network
    pub service_cidr: Option<String>,
    /// CIDR of the pod network
    pub pod_cidr: Option<String>,
    /// Subnet prefix length assigned to each node
    pub host_prefix: Option<i64>,
    /// Cluster-wide proxy
    pub proxy: Option<ProxySettings>,
    /// Version identifier, e.g. `openshift-v4.11.12`
    pub version: Option<String>,
    /// Wait for the cluster to become ready (create) or removed (delete);
    /// unset means wait
    pub wait: Option<bool>,
}

impl DesiredState {
    /// Whether create/delete should block until the remote system converges
    #[must_use]
    pub fn should_wait(&self) -> bool {
        self.wait.unwrap_or(true)
    }
}

/// Observed cluster state, fully assigned after a successful read/create/update
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservedState {
    /// Remote identifier (computed)
    pub id: Option<String>,
    /// External identifier (computed)
    pub external_id: Option<String>,
    /// Cluster name
    pub name: Option<String>,
    /// Cloud provider, e.g. `aws`
    pub cloud_provider: Option<String>,
    /// Product, e.g. `rosa` or `osd`
    pub product: Option<String>,
    /// Cloud region, e.g. `us-east-1`
    pub cloud_region: Option<String>,
    /// Spread nodes over several availability zones
    pub multi_az: Option<bool>,
    /// User defined properties
    pub properties: Option<BTreeMap<String, String>>,
    /// API server URL (computed)
    pub api_url: Option<String>,
    /// Web console URL (computed)
    pub console_url: Option<String>,
    /// `<name>.<base DNS domain>`
    pub domain: Option<String>,
    /// Run on the customer's own cloud account
    pub ccs_enabled: Option<bool>,
    /// Encrypt etcd data
    pub etcd_encryption: Option<bool>,
    /// Number of compute nodes; exclusive with autoscaling
    pub compute_nodes: Option<i64>,
    /// Instance type of the compute nodes
    pub compute_machine_type: Option<String>,
    /// Availability zones of the nodes
    pub availability_zones: Option<Vec<String>>,
    /// Scale the compute nodes between `min_replicas` and `max_replicas`
    pub autoscaling_enabled: Option<bool>,
    /// Lower autoscaling bound
    pub min_replicas: Option<i64>,
    /// Upper autoscaling bound
    pub max_replicas: Option<i64>,
    /// AWS account the cluster runs in; never echoed back by the remote system
    pub aws_account_id: Option<String>,
    /// Access key of the simple credentials
    pub aws_access_key_id: Option<String>,
    /// Secret key of the simple credentials
    pub aws_secret_access_key: Option<String>,
    /// Existing subnets to install into
    pub aws_subnet_ids: Option<Vec<String>>,
    /// Expose the API through AWS PrivateLink only
    pub aws_private_link: Option<bool>,
    /// STS role configuration; exclusive with the simple credentials
    pub sts: Option<StsSettings>,
    /// CIDR of the node network
    pub machine_cidr: Option<String>,
    /// CIDR of the service network
    pub service_cidr: Option<String>,
    /// CIDR of the pod network
    pub pod_cidr: Option<String>,
    /// Subnet prefix length assigned to each node
    pub host_prefix: Option<i64>,
    /// Cluster-wide proxy
    pub proxy: Option<ProxySettings>,
    /// Version identifier, e.g. `openshift-v4.11.12`
    pub version: Option<String>,
    /// Lifecycle state string as reported by the remote system
    pub state: Option<String>,
    /// Whether create/delete block until the remote system converges
    pub wait: Option<bool>,
}

impl ObservedState {
    /// Seed a working state from the caller's desired state.
    ///
    /// Values the remote system never echoes back (the AWS account id, a
    /// caller-chosen operator role prefix, the wait flag) survive population
    /// only through this seed.
    #[must_use]
    pub fn from_desired(desired: &DesiredState) -> Self {
        Self {
            name: desired.name.clone(),
            cloud_provider: desired.cloud_provider.clone(),
            product: desired.product.clone(),
            cloud_region: desired.cloud_region.clone(),
            multi_az: desired.multi_az,
            properties: desired.properties.clone(),
            ccs_enabled: desired.ccs_enabled,
            etcd_encryption: desired.etcd_encryption,
            compute_nodes: desired.compute_nodes,
            compute_machine_type: desired.compute_machine_type.clone(),
            availability_zones: desired.availability_zones.clone(),
            autoscaling_enabled: desired.autoscaling_enabled,
            min_replicas: desired.min_replicas,
            max_replicas: desired.max_replicas,
            aws_account_id: desired.aws_account_id.clone(),
            aws_access_key_id: desired.aws_access_key_id.clone(),
            aws_secret_access_key: desired.aws_secret_access_key.clone(),
            aws_subnet_ids: desired.aws_subnet_ids.clone(),
            aws_private_link: desired.aws_private_link,
            sts: desired.sts.clone(),
            machine_cidr: desired.machine_cidr.clone(),
            service_cidr: desired.service_cidr.clone(),
            pod_cidr: desired.pod_cidr.clone(),
            host_prefix: desired.host_prefix,
            proxy: desired.proxy.clone(),
            version: desired.version.clone(),
            wait: desired.wait,
            ..Self::default()
        }
    }

    /// Project the observed values back onto a desired state, e.g. as the
    /// starting point for an update
    ///
    /// The node count reported for an autoscaled cluster is dropped: a count
    /// and autoscaling can't be requested together.
    #[must_use]
    pub fn to_desired(&self) -> DesiredState {
        let compute_nodes = if self.autoscaling_enabled == Some(true) {
            None
        } else {
            self.compute_nodes
        };
        DesiredState {
            name: self.name.clone(),
            cloud_provider: self.cloud_provider.clone(),
            product: self.product.clone(),
            cloud_region: self.cloud_region.clone(),
            multi_az: self.multi_az,
            properties: self.properties.clone(),
            ccs_enabled: self.ccs_enabled,
            etcd_encryption: self.etcd_encryption,
            compute_nodes,
            compute_machine_type: self.compute_machine_type.clone(),
            availability_zones: self.availability_zones.clone(),
            autoscaling_enabled: self.autoscaling_enabled,
            min_replicas: self.min_replicas,
            max_replicas: self.max_replicas,
            aws_account_id: self.aws_account_id.clone(),
            aws_access_key_id: self.aws_access_key_id.clone(),
            aws_secret_access_key: self.aws_secret_access_key.clone(),
            aws_subnet_ids: self.aws_subnet_ids.clone(),
            aws_private_link: self.aws_private_link,
            sts: self.sts.clone(),
            machine_cidr: self.machine_cidr.clone(),
            service_cidr: self.service_cidr.clone(),
            pod_cidr: self.pod_cidr.clone(),
            host_prefix: self.host_prefix,
            proxy: self.proxy.clone(),
            version: self.version.clone(),
            wait: self.wait,
        }
    }
}

/// Key used to look up an existing cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterLookup {
    /// Search by cluster name
    Name(String),
    /// Search by cluster identifier
    Id(String),
}

/// Summary returned by a lookup
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// Remote identifier
    pub id: String,
    /// Cluster name
    pub name: String,
    /// Lifecycle state as reported by the remote system
    pub state: String,
    /// OpenShift version, or the version identifier when the remote reports none
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_defaults_to_true() {
        assert!(DesiredState::default().should_wait());
        let desired = DesiredState {
            wait: Some(false),
            ..Default::default()
        };
        assert!(!desired.should_wait());
    }

    #[test]
    fn test_seed_and_project_round_trip() {
        let desired = DesiredState {
            name: Some("my-cluster".to_string()),
            aws_account_id: Some("123456789012".to_string()),
            availability_zones: Some(vec![]),
            wait: Some(false),
            ..Default::default()
        };
        let observed = ObservedState::from_desired(&desired);
        assert_eq!(observed.id, None);
        assert_eq!(observed.to_desired(), desired);
    }

    #[test]
    fn test_projection_drops_node_count_of_autoscaled_cluster() {
        let observed = ObservedState {
            compute_nodes: Some(5),
            autoscaling_enabled: Some(true),
            min_replicas: Some(2),
            max_replicas: Some(4),
            ..Default::default()
        };
        let desired = observed.to_desired();
        assert_eq!(desired.compute_nodes, None);
        assert_eq!(desired.autoscaling_enabled, Some(true));
        assert_eq!(desired.min_replicas, Some(2));

        let observed = ObservedState {
            compute_nodes: Some(5),
            autoscaling_enabled: Some(false),
            ..Default::default()
        };
        assert_eq!(observed.to_desired().compute_nodes, Some(5));
    }
}

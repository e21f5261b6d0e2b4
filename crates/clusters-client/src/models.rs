//! Cluster management API models
//!
//! These models mirror the cluster resource of the managed cluster service.
//! Every optional attribute is stored as an `Option` and exposed through a
//! `get_*` accessor so callers can tell "not returned" from "returned empty".
//! Values are constructed through the builders in [`crate::builder`] and are
//! not mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Lifecycle state reported by the remote system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterState {
    /// Installation parameters are being validated
    Validating,
    /// Waiting for user action (e.g. STS roles)
    Waiting,
    /// Accepted, installation not started yet
    Pending,
    /// Installation in progress
    Installing,
    /// Cluster is ready for use
    Ready,
    /// Installation or operation failed
    Error,
    /// Cluster is hibernating
    Hibernating,
    /// Cluster is being powered down
    PoweringDown,
    /// Cluster is resuming from hibernation
    Resuming,
    /// Cluster is being removed
    Uninstalling,
    /// Any state this client does not know about
    #[default]
    #[serde(other)]
    Unknown,
}

impl ClusterState {
    /// Wire representation of the state
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Waiting => "waiting",
            Self::Pending => "pending",
            Self::Installing => "installing",
            Self::Ready => "ready",
            Self::Error => "error",
            Self::Hibernating => "hibernating",
            Self::PoweringDown => "powering_down",
            Self::Resuming => "resuming",
            Self::Uninstalling => "uninstalling",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ClusterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the cluster API server listens for connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListeningMethod {
    /// Reachable from the internet
    External,
    /// Reachable only from inside the VPC (private link)
    Internal,
}

/// Reference to another API object by identifier
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectReference {
    pub(crate) id: Option<String>,
}

impl ObjectReference {
    /// Referenced identifier, if present
    #[must_use]
    pub fn get_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// API server settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterApi {
    pub(crate) url: Option<String>,
    pub(crate) listening: Option<ListeningMethod>,
}

impl ClusterApi {
    /// API server URL
    #[must_use]
    pub fn get_url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Listening method override
    #[must_use]
    pub fn get_listening(&self) -> Option<ListeningMethod> {
        self.listening
    }
}

/// Web console settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConsole {
    pub(crate) url: Option<String>,
}

impl ClusterConsole {
    /// Console URL
    #[must_use]
    pub fn get_url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// DNS settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dns {
    pub(crate) base_domain: Option<String>,
}

impl Dns {
    /// Base DNS domain assigned by the service
    #[must_use]
    pub fn get_base_domain(&self) -> Option<&str> {
        self.base_domain.as_deref()
    }
}

/// Autoscaling bounds for the default compute pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MachinePoolAutoscaling {
    pub(crate) min_replicas: Option<i64>,
    pub(crate) max_replicas: Option<i64>,
}

impl MachinePoolAutoscaling {
    /// Lower replica bound
    #[must_use]
    pub fn get_min_replicas(&self) -> Option<i64> {
        self.min_replicas
    }

    /// Upper replica bound
    #[must_use]
    pub fn get_max_replicas(&self) -> Option<i64> {
        self.max_replicas
    }
}

/// Compute node settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterNodes {
    pub(crate) compute: Option<i64>,
    pub(crate) compute_machine_type: Option<ObjectReference>,
    pub(crate) availability_zones: Option<Vec<String>>,
    pub(crate) autoscale_compute: Option<MachinePoolAutoscaling>,
}

impl ClusterNodes {
    /// Literal compute node count
    #[must_use]
    pub fn get_compute(&self) -> Option<i64> {
        self.compute
    }

    /// Machine type of the compute nodes
    #[must_use]
    pub fn get_compute_machine_type(&self) -> Option<&ObjectReference> {
        self.compute_machine_type.as_ref()
    }

    /// Availability zones, in the order reported
    #[must_use]
    pub fn get_availability_zones(&self) -> Option<&[String]> {
        self.availability_zones.as_deref()
    }

    /// Autoscaling bounds; presence means autoscaling is enabled
    #[must_use]
    pub fn get_autoscale_compute(&self) -> Option<&MachinePoolAutoscaling> {
        self.autoscale_compute.as_ref()
    }
}

/// Customer cloud subscription settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ccs {
    pub(crate) enabled: Option<bool>,
}

impl Ccs {
    /// Whether CCS is enabled
    #[must_use]
    pub fn get_enabled(&self) -> Option<bool> {
        self.enabled
    }
}

/// Instance profile roles used by STS clusters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceIamRoles {
    pub(crate) master_role_arn: Option<String>,
    pub(crate) worker_role_arn: Option<String>,
}

impl InstanceIamRoles {
    /// Control plane instance role
    #[must_use]
    pub fn get_master_role_arn(&self) -> Option<&str> {
        self.master_role_arn.as_deref()
    }

    /// Worker instance role
    #[must_use]
    pub fn get_worker_role_arn(&self) -> Option<&str> {
        self.worker_role_arn.as_deref()
    }
}

/// AWS Security Token Service configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Sts {
    pub(crate) role_arn: Option<String>,
    pub(crate) support_role_arn: Option<String>,
    pub(crate) instance_iam_roles: Option<InstanceIamRoles>,
    pub(crate) operator_role_prefix: Option<String>,
    pub(crate) oidc_endpoint_url: Option<String>,
}

impl Sts {
    /// Installer role ARN
    #[must_use]
    pub fn get_role_arn(&self) -> Option<&str> {
        self.role_arn.as_deref()
    }

    /// Support role ARN
    #[must_use]
    pub fn get_support_role_arn(&self) -> Option<&str> {
        self.support_role_arn.as_deref()
    }

    /// Instance profile roles
    #[must_use]
    pub fn get_instance_iam_roles(&self) -> Option<&InstanceIamRoles> {
        self.instance_iam_roles.as_ref()
    }

    /// Prefix used to name operator roles
    #[must_use]
    pub fn get_operator_role_prefix(&self) -> Option<&str> {
        self.operator_role_prefix.as_deref()
    }

    /// OIDC federation endpoint, computed by the service
    #[must_use]
    pub fn get_oidc_endpoint_url(&self) -> Option<&str> {
        self.oidc_endpoint_url.as_deref()
    }
}

/// AWS account settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Aws {
    pub(crate) account_id: Option<String>,
    pub(crate) access_key_id: Option<String>,
    pub(crate) secret_access_key: Option<String>,
    pub(crate) private_link: Option<bool>,
    pub(crate) subnet_ids: Option<Vec<String>>,
    pub(crate) sts: Option<Sts>,
}

impl Aws {
    /// AWS account identifier (not always echoed back by the service)
    #[must_use]
    pub fn get_account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    /// Access key of the simple credential pair
    #[must_use]
    pub fn get_access_key_id(&self) -> Option<&str> {
        self.access_key_id.as_deref()
    }

    /// Secret of the simple credential pair
    #[must_use]
    pub fn get_secret_access_key(&self) -> Option<&str> {
        self.secret_access_key.as_deref()
    }

    /// Whether the cluster uses AWS private link
    #[must_use]
    pub fn get_private_link(&self) -> Option<bool> {
        self.private_link
    }

    /// Existing VPC subnets, in the order supplied
    #[must_use]
    pub fn get_subnet_ids(&self) -> Option<&[String]> {
        self.subnet_ids.as_deref()
    }

    /// STS configuration
    #[must_use]
    pub fn get_sts(&self) -> Option<&Sts> {
        self.sts.as_ref()
    }
}

/// Network CIDR settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Network {
    pub(crate) machine_cidr: Option<String>,
    pub(crate) service_cidr: Option<String>,
    pub(crate) pod_cidr: Option<String>,
    pub(crate) host_prefix: Option<i64>,
}

impl Network {
    /// Block of IP addresses for nodes
    #[must_use]
    pub fn get_machine_cidr(&self) -> Option<&str> {
        self.machine_cidr.as_deref()
    }

    /// Block of IP addresses for services
    #[must_use]
    pub fn get_service_cidr(&self) -> Option<&str> {
        self.service_cidr.as_deref()
    }

    /// Block of IP addresses for pods
    #[must_use]
    pub fn get_pod_cidr(&self) -> Option<&str> {
        self.pod_cidr.as_deref()
    }

    /// Subnet prefix length assigned to each node
    #[must_use]
    pub fn get_host_prefix(&self) -> Option<i64> {
        self.host_prefix
    }
}

/// Cluster-wide proxy settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Proxy {
    pub(crate) http_proxy: Option<String>,
    pub(crate) https_proxy: Option<String>,
    pub(crate) no_proxy: Option<String>,
}

impl Proxy {
    /// HTTP proxy URL
    #[must_use]
    pub fn get_http_proxy(&self) -> Option<&str> {
        self.http_proxy.as_deref()
    }

    /// HTTPS proxy URL
    #[must_use]
    pub fn get_https_proxy(&self) -> Option<&str> {
        self.https_proxy.as_deref()
    }

    /// Comma separated list of hosts that bypass the proxy
    #[must_use]
    pub fn get_no_proxy(&self) -> Option<&str> {
        self.no_proxy.as_deref()
    }
}

/// Cluster model matching the cluster management API resource
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Cluster {
    pub(crate) id: Option<String>,
    pub(crate) external_id: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) cloud_provider: Option<ObjectReference>,
    pub(crate) product: Option<ObjectReference>,
    pub(crate) region: Option<ObjectReference>,
    pub(crate) multi_az: Option<bool>,
    pub(crate) properties: Option<BTreeMap<String, String>>,
    pub(crate) api: Option<ClusterApi>,
    pub(crate) console: Option<ClusterConsole>,
    pub(crate) dns: Option<Dns>,
    pub(crate) nodes: Option<ClusterNodes>,
    pub(crate) ccs: Option<Ccs>,
    pub(crate) etcd_encryption: Option<bool>,
    pub(crate) aws: Option<Aws>,
    pub(crate) network: Option<Network>,
    pub(crate) proxy: Option<Proxy>,
    pub(crate) version: Option<ObjectReference>,
    pub(crate) openshift_version: Option<String>,
    pub(crate) state: Option<ClusterState>,
}

impl Cluster {
    /// Identifier, or the empty string when absent
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    /// Name, or the empty string when absent
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Reported state, [`ClusterState::Unknown`] when absent
    #[must_use]
    pub fn state(&self) -> ClusterState {
        self.state.unwrap_or_default()
    }

    /// Identifier assigned by the service
    #[must_use]
    pub fn get_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// External (cluster-reported) identifier
    #[must_use]
    pub fn get_external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    /// Cluster name
    #[must_use]
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Cloud provider reference
    #[must_use]
    pub fn get_cloud_provider(&self) -> Option<&ObjectReference> {
        self.cloud_provider.as_ref()
    }

    /// Product reference
    #[must_use]
    pub fn get_product(&self) -> Option<&ObjectReference> {
        self.product.as_ref()
    }

    /// Cloud region reference
    #[must_use]
    pub fn get_region(&self) -> Option<&ObjectReference> {
        self.region.as_ref()
    }

    /// Multi availability zone flag
    #[must_use]
    pub fn get_multi_az(&self) -> Option<bool> {
        self.multi_az
    }

    /// User defined properties
    #[must_use]
    pub fn get_properties(&self) -> Option<&BTreeMap<String, String>> {
        self.properties.as_ref()
    }

    /// API server settings
    #[must_use]
    pub fn get_api(&self) -> Option<&ClusterApi> {
        self.api.as_ref()
    }

    /// Console settings
    #[must_use]
    pub fn get_console(&self) -> Option<&ClusterConsole> {
        self.console.as_ref()
    }

    /// DNS settings
    #[must_use]
    pub fn get_dns(&self) -> Option<&Dns> {
        self.dns.as_ref()
    }

    /// Compute node settings
    #[must_use]
    pub fn get_nodes(&self) -> Option<&ClusterNodes> {
        self.nodes.as_ref()
    }

    /// Customer cloud subscription settings
    #[must_use]
    pub fn get_ccs(&self) -> Option<&Ccs> {
        self.ccs.as_ref()
    }

    /// etcd encryption flag
    #[must_use]
    pub fn get_etcd_encryption(&self) -> Option<bool> {
        self.etcd_encryption
    }

    /// AWS settings
    #[must_use]
    pub fn get_aws(&self) -> Option<&Aws> {
        self.aws.as_ref()
    }

    /// Network settings
    #[must_use]
    pub fn get_network(&self) -> Option<&Network> {
        self.network.as_ref()
    }

    /// Proxy settings
    #[must_use]
    pub fn get_proxy(&self) -> Option<&Proxy> {
        self.proxy.as_ref()
    }

    /// Version reference (e.g. `openshift-v4.11.12`)
    #[must_use]
    pub fn get_version(&self) -> Option<&ObjectReference> {
        self.version.as_ref()
    }

    /// Raw OpenShift version reported by list endpoints (e.g. `4.11.12`)
    #[must_use]
    pub fn get_openshift_version(&self) -> Option<&str> {
        self.openshift_version.as_deref()
    }

    /// Reported lifecycle state
    #[must_use]
    pub fn get_state(&self) -> Option<ClusterState> {
        self.state
    }
}

//! Builders for cluster model values
//!
//! Builders are consumed by value and produce immutable models. Nested
//! builders expose `is_empty()` so callers can skip attaching a structure when
//! no sub-field was set; attaching an empty structure would send an explicit
//! but vacant object and clobber remote defaults.

use crate::models::*;
use std::collections::BTreeMap;

/// Builder for [`MachinePoolAutoscaling`]
#[derive(Debug, Clone, Default)]
pub struct AutoscalingBuilder {
    inner: MachinePoolAutoscaling,
}

impl AutoscalingBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lower replica bound
    #[must_use]
    pub fn min_replicas(mut self, value: i64) -> Self {
        self.inner.min_replicas = Some(value);
        self
    }

    /// Set the upper replica bound
    #[must_use]
    pub fn max_replicas(mut self, value: i64) -> Self {
        self.inner.max_replicas = Some(value);
        self
    }

    /// `true` when no bound was set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.min_replicas.is_none() && self.inner.max_replicas.is_none()
    }

    /// Finish the value
    #[must_use]
    pub fn build(self) -> MachinePoolAutoscaling {
        self.inner
    }
}

/// Builder for [`ClusterNodes`]
#[derive(Debug, Clone, Default)]
pub struct ClusterNodesBuilder {
    inner: ClusterNodes,
}

impl ClusterNodesBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the literal compute node count
    #[must_use]
    pub fn compute(mut self, value: i64) -> Self {
        self.inner.compute = Some(value);
        self
    }

    /// Set the compute machine type
    #[must_use]
    pub fn compute_machine_type(mut self, id: impl Into<String>) -> Self {
        self.inner.compute_machine_type = Some(ObjectReference { id: Some(id.into()) });
        self
    }

    /// Set the availability zones (order preserved)
    #[must_use]
    pub fn availability_zones<I, S>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.availability_zones = Some(zones.into_iter().map(Into::into).collect());
        self
    }

    /// Attach autoscaling bounds; an attached value enables autoscaling even when
    /// no bound is set
    #[must_use]
    pub fn autoscale_compute(mut self, autoscaling: AutoscalingBuilder) -> Self {
        self.inner.autoscale_compute = Some(autoscaling.build());
        self
    }

    /// `true` when nothing was set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner == ClusterNodes::default()
    }

    /// Finish the value
    #[must_use]
    pub fn build(self) -> ClusterNodes {
        self.inner
    }
}

/// Builder for [`InstanceIamRoles`]
#[derive(Debug, Clone, Default)]
pub struct InstanceIamRolesBuilder {
    inner: InstanceIamRoles,
}

impl InstanceIamRolesBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the control plane instance role
    #[must_use]
    pub fn master_role_arn(mut self, value: impl Into<String>) -> Self {
        self.inner.master_role_arn = Some(value.into());
        self
    }

    /// Set the worker instance role
    #[must_use]
    pub fn worker_role_arn(mut self, value: impl Into<String>) -> Self {
        self.inner.worker_role_arn = Some(value.into());
        self
    }

    /// `true` when nothing was set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner == InstanceIamRoles::default()
    }

    /// Finish the value
    #[must_use]
    pub fn build(self) -> InstanceIamRoles {
        self.inner
    }
}

/// Builder for [`Sts`]
#[derive(Debug, Clone, Default)]
pub struct StsBuilder {
    inner: Sts,
}

impl StsBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the installer role ARN
    #[must_use]
    pub fn role_arn(mut self, value: impl Into<String>) -> Self {
        self.inner.role_arn = Some(value.into());
        self
    }

    /// Set the support role ARN
    #[must_use]
    pub fn support_role_arn(mut self, value: impl Into<String>) -> Self {
        self.inner.support_role_arn = Some(value.into());
        self
    }

    /// Set the instance profile roles
    #[must_use]
    pub fn instance_iam_roles(mut self, roles: InstanceIamRolesBuilder) -> Self {
        self.inner.instance_iam_roles = Some(roles.build());
        self
    }

    /// Set the operator role prefix
    #[must_use]
    pub fn operator_role_prefix(mut self, value: impl Into<String>) -> Self {
        self.inner.operator_role_prefix = Some(value.into());
        self
    }

    /// Set the OIDC endpoint (normally computed by the service)
    #[must_use]
    pub fn oidc_endpoint_url(mut self, value: impl Into<String>) -> Self {
        self.inner.oidc_endpoint_url = Some(value.into());
        self
    }

    /// `true` when nothing was set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner == Sts::default()
    }

    /// Finish the value
    #[must_use]
    pub fn build(self) -> Sts {
        self.inner
    }
}

/// Builder for [`Aws`]
#[derive(Debug, Clone, Default)]
pub struct AwsBuilder {
    inner: Aws,
}

impl AwsBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AWS account identifier
    #[must_use]
    pub fn account_id(mut self, value: impl Into<String>) -> Self {
        self.inner.account_id = Some(value.into());
        self
    }

    /// Set the access key of the simple credential pair
    #[must_use]
    pub fn access_key_id(mut self, value: impl Into<String>) -> Self {
        self.inner.access_key_id = Some(value.into());
        self
    }

    /// Set the secret of the simple credential pair
    #[must_use]
    pub fn secret_access_key(mut self, value: impl Into<String>) -> Self {
        self.inner.secret_access_key = Some(value.into());
        self
    }

    /// Set the private link flag
    #[must_use]
    pub fn private_link(mut self, value: bool) -> Self {
        self.inner.private_link = Some(value);
        self
    }

    /// Set the subnet identifiers (order preserved)
    #[must_use]
    pub fn subnet_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.subnet_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Attach the STS configuration
    #[must_use]
    pub fn sts(mut self, sts: StsBuilder) -> Self {
        self.inner.sts = Some(sts.build());
        self
    }

    /// `true` when nothing was set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner == Aws::default()
    }

    /// Finish the value
    #[must_use]
    pub fn build(self) -> Aws {
        self.inner
    }
}

/// Builder for [`Network`]
#[derive(Debug, Clone, Default)]
pub struct NetworkBuilder {
    inner: Network,
}

impl NetworkBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the machine CIDR
    #[must_use]
    pub fn machine_cidr(mut self, value: impl Into<String>) -> Self {
        self.inner.machine_cidr = Some(value.into());
        self
    }

    /// Set the service CIDR
    #[must_use]
    pub fn service_cidr(mut self, value: impl Into<String>) -> Self {
        self.inner.service_cidr = Some(value.into());
        self
    }

    /// Set the pod CIDR
    #[must_use]
    pub fn pod_cidr(mut self, value: impl Into<String>) -> Self {
        self.inner.pod_cidr = Some(value.into());
        self
    }

    /// Set the host prefix length
    #[must_use]
    pub fn host_prefix(mut self, value: i64) -> Self {
        self.inner.host_prefix = Some(value);
        self
    }

    /// `true` when nothing was set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner == Network::default()
    }

    /// Finish the value
    #[must_use]
    pub fn build(self) -> Network {
        self.inner
    }
}

/// Builder for [`Proxy`]
#[derive(Debug, Clone, Default)]
pub struct ProxyBuilder {
    inner: Proxy,
}

impl ProxyBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP proxy
    #[must_use]
    pub fn http_proxy(mut self, value: impl Into<String>) -> Self {
        self.inner.http_proxy = Some(value.into());
        self
    }

    /// Set the HTTPS proxy
    #[must_use]
    pub fn https_proxy(mut self, value: impl Into<String>) -> Self {
        self.inner.https_proxy = Some(value.into());
        self
    }

    /// Set the no-proxy list
    #[must_use]
    pub fn no_proxy(mut self, value: impl Into<String>) -> Self {
        self.inner.no_proxy = Some(value.into());
        self
    }

    /// `true` when nothing was set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner == Proxy::default()
    }

    /// Finish the value
    #[must_use]
    pub fn build(self) -> Proxy {
        self.inner
    }
}

/// Builder for [`ClusterApi`]
#[derive(Debug, Clone, Default)]
pub struct ClusterApiBuilder {
    inner: ClusterApi,
}

impl ClusterApiBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API URL (normally computed by the service)
    #[must_use]
    pub fn url(mut self, value: impl Into<String>) -> Self {
        self.inner.url = Some(value.into());
        self
    }

    /// Set the listening method
    #[must_use]
    pub fn listening(mut self, value: ListeningMethod) -> Self {
        self.inner.listening = Some(value);
        self
    }

    /// Finish the value
    #[must_use]
    pub fn build(self) -> ClusterApi {
        self.inner
    }
}

/// Builder for [`Cluster`]
#[derive(Debug, Clone, Default)]
pub struct ClusterBuilder {
    inner: Cluster,
}

impl ClusterBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifier (service assigned)
    #[must_use]
    pub fn id(mut self, value: impl Into<String>) -> Self {
        self.inner.id = Some(value.into());
        self
    }

    /// Set the external identifier (service assigned)
    #[must_use]
    pub fn external_id(mut self, value: impl Into<String>) -> Self {
        self.inner.external_id = Some(value.into());
        self
    }

    /// Set the name
    #[must_use]
    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.inner.name = Some(value.into());
        self
    }

    /// Set the cloud provider identifier
    #[must_use]
    pub fn cloud_provider(mut self, id: impl Into<String>) -> Self {
        self.inner.cloud_provider = Some(ObjectReference { id: Some(id.into()) });
        self
    }

    /// Set the product identifier
    #[must_use]
    pub fn product(mut self, id: impl Into<String>) -> Self {
        self.inner.product = Some(ObjectReference { id: Some(id.into()) });
        self
    }

    /// Set the cloud region identifier
    #[must_use]
    pub fn region(mut self, id: impl Into<String>) -> Self {
        self.inner.region = Some(ObjectReference { id: Some(id.into()) });
        self
    }

    /// Set the multi availability zone flag
    #[must_use]
    pub fn multi_az(mut self, value: bool) -> Self {
        self.inner.multi_az = Some(value);
        self
    }

    /// Set user defined properties
    #[must_use]
    pub fn properties(mut self, properties: BTreeMap<String, String>) -> Self {
        self.inner.properties = Some(properties);
        self
    }

    /// Attach API server settings
    #[must_use]
    pub fn api(mut self, api: ClusterApiBuilder) -> Self {
        self.inner.api = Some(api.build());
        self
    }

    /// Set the console URL (service assigned)
    #[must_use]
    pub fn console_url(mut self, value: impl Into<String>) -> Self {
        self.inner.console = Some(ClusterConsole { url: Some(value.into()) });
        self
    }

    /// Set the base DNS domain (service assigned)
    #[must_use]
    pub fn base_domain(mut self, value: impl Into<String>) -> Self {
        self.inner.dns = Some(Dns { base_domain: Some(value.into()) });
        self
    }

    /// Attach compute node settings
    #[must_use]
    pub fn nodes(mut self, nodes: ClusterNodesBuilder) -> Self {
        self.inner.nodes = Some(nodes.build());
        self
    }

    /// Set the customer cloud subscription flag
    #[must_use]
    pub fn ccs_enabled(mut self, value: bool) -> Self {
        self.inner.ccs = Some(Ccs { enabled: Some(value) });
        self
    }

    /// Set the etcd encryption flag
    #[must_use]
    pub fn etcd_encryption(mut self, value: bool) -> Self {
        self.inner.etcd_encryption = Some(value);
        self
    }

    /// Attach AWS settings
    #[must_use]
    pub fn aws(mut self, aws: AwsBuilder) -> Self {
        self.inner.aws = Some(aws.build());
        self
    }

    /// Attach network settings
    #[must_use]
    pub fn network(mut self, network: NetworkBuilder) -> Self {
        self.inner.network = Some(network.build());
        self
    }

    /// Attach proxy settings
    #[must_use]
    pub fn proxy(mut self, proxy: ProxyBuilder) -> Self {
        self.inner.proxy = Some(proxy.build());
        self
    }

    /// Set the version identifier (e.g. `openshift-v4.11.12`)
    #[must_use]
    pub fn version(mut self, id: impl Into<String>) -> Self {
        self.inner.version = Some(ObjectReference { id: Some(id.into()) });
        self
    }

    /// Set the raw OpenShift version (service assigned)
    #[must_use]
    pub fn openshift_version(mut self, value: impl Into<String>) -> Self {
        self.inner.openshift_version = Some(value.into());
        self
    }

    /// Set the lifecycle state (service assigned)
    #[must_use]
    pub fn state(mut self, value: ClusterState) -> Self {
        self.inner.state = Some(value);
        self
    }

    /// `true` when nothing was set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner == Cluster::default()
    }

    /// Finish the value
    #[must_use]
    pub fn build(self) -> Cluster {
        self.inner
    }
}

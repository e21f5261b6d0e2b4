//! DesiredState → Cluster

use super::StateMapper;
use crate::error::ReconcilerError;
use crate::state::{DesiredState, ProxySettings, StsSettings};
use clusters_client::{
    AutoscalingBuilder, AwsBuilder, Cluster, ClusterApiBuilder, ClusterBuilder,
    ClusterNodesBuilder, InstanceIamRolesBuilder, ListeningMethod, NetworkBuilder, ProxyBuilder,
    StsBuilder,
};
use tracing::debug;

impl StateMapper {
    /// Build the cluster to create from `desired`
    ///
    /// Only provided fields are materialized. Nested structures are attached
    /// only when at least one of their fields was provided.
    ///
    /// # Errors
    ///
    /// - `ReconcilerError::Validation` if a required field is missing, the
    ///   credential or autoscaling settings are inconsistent, or the version
    ///   doesn't parse
    /// - `ReconcilerError::UnsupportedVersion` if the version is below the minimum
    pub fn build(&self, desired: &DesiredState) -> Result<Cluster, ReconcilerError> {
        let name = required("name", desired.name.as_deref())?;
        let cloud_provider = required("cloud provider", desired.cloud_provider.as_deref())?;
        let product = required("product", desired.product.as_deref())?;
        let region = required("cloud region", desired.cloud_region.as_deref())?;

        validate_credentials(desired)?;
        validate_autoscaling(desired)?;

        let mut builder = ClusterBuilder::new()
            .name(name)
            .cloud_provider(cloud_provider)
            .product(product)
            .region(region);

        if let Some(multi_az) = desired.multi_az {
            builder = builder.multi_az(multi_az);
        }
        if let Some(properties) = &desired.properties {
            builder = builder.properties(properties.clone());
        }
        if let Some(etcd_encryption) = desired.etcd_encryption {
            builder = builder.etcd_encryption(etcd_encryption);
        }

        // STS clusters always run on the customer's cloud account
        let ccs_enabled = if desired.sts.is_some() {
            Some(true)
        } else {
            desired.ccs_enabled
        };
        if let Some(ccs_enabled) = ccs_enabled {
            builder = builder.ccs_enabled(ccs_enabled);
        }

        let nodes = nodes_builder(desired);
        if !nodes.is_empty() {
            builder = builder.nodes(nodes);
        }

        let aws = aws_builder(desired);
        if !aws.is_empty() {
            builder = builder.aws(aws);
        }
        if desired.aws_private_link == Some(true) {
            builder = builder.api(ClusterApiBuilder::new().listening(ListeningMethod::Internal));
        }

        let network = network_builder(desired);
        if !network.is_empty() {
            builder = builder.network(network);
        }

        if let Some(proxy) = &desired.proxy {
            let proxy = proxy_builder(proxy);
            if !proxy.is_empty() {
                builder = builder.proxy(proxy);
            }
        }

        if let Some(version) = &desired.version {
            self.check_version(version)?;
            builder = builder.version(version.clone());
        }

        debug!("Built cluster '{}' for {} in {}", name, cloud_provider, region);
        Ok(builder.build())
    }

    fn check_version(&self, version: &str) -> Result<(), ReconcilerError> {
        match self.version_gate.is_supported(version) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ReconcilerError::UnsupportedVersion {
                version: version.to_string(),
                minimum: self.version_gate.minimum().to_string(),
            }),
            Err(e) => Err(ReconcilerError::Validation(e.to_string())),
        }
    }
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ReconcilerError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ReconcilerError::Validation(format!("{field} is required"))),
    }
}

fn validate_credentials(desired: &DesiredState) -> Result<(), ReconcilerError> {
    let Some(sts) = &desired.sts else {
        return Ok(());
    };
    if desired.aws_access_key_id.is_some() || desired.aws_secret_access_key.is_some() {
        return Err(ReconcilerError::Validation(
            "AWS access keys can't be combined with STS roles".to_string(),
        ));
    }
    if desired.ccs_enabled == Some(false) {
        return Err(ReconcilerError::Validation(
            "STS clusters require CCS to be enabled".to_string(),
        ));
    }
    if sts.role_arn.as_deref().is_some_and(str::is_empty) {
        return Err(ReconcilerError::Validation(
            "STS role ARN can't be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_autoscaling(desired: &DesiredState) -> Result<(), ReconcilerError> {
    if desired.autoscaling_enabled != Some(true) {
        if desired.min_replicas.is_some() || desired.max_replicas.is_some() {
            return Err(ReconcilerError::Validation(
                "Autoscaling must be enabled in order to set min and max replicas".to_string(),
            ));
        }
        return Ok(());
    }

    if desired.compute_nodes.is_some() {
        return Err(ReconcilerError::Validation(
            "Compute nodes can't be set when autoscaling is enabled".to_string(),
        ));
    }
    match (desired.min_replicas, desired.max_replicas) {
        (Some(min), Some(max)) if min > max => Err(ReconcilerError::Validation(format!(
            "Min replicas ({min}) can't be greater than max replicas ({max})"
        ))),
        (Some(_), Some(_)) => Ok(()),
        _ => Err(ReconcilerError::Validation(
            "Min and max replicas are required when autoscaling is enabled".to_string(),
        )),
    }
}

/// Autoscaling bounds carrying whichever of `min`/`max` is set
pub(crate) fn autoscaling_builder(min: Option<i64>, max: Option<i64>) -> AutoscalingBuilder {
    let mut autoscaling = AutoscalingBuilder::new();
    if let Some(min) = min {
        autoscaling = autoscaling.min_replicas(min);
    }
    if let Some(max) = max {
        autoscaling = autoscaling.max_replicas(max);
    }
    autoscaling
}

pub(crate) fn proxy_builder(proxy: &ProxySettings) -> ProxyBuilder {
    let mut builder = ProxyBuilder::new();
    if let Some(http_proxy) = &proxy.http_proxy {
        builder = builder.http_proxy(http_proxy.clone());
    }
    if let Some(https_proxy) = &proxy.https_proxy {
        builder = builder.https_proxy(https_proxy.clone());
    }
    if let Some(no_proxy) = &proxy.no_proxy {
        builder = builder.no_proxy(no_proxy.clone());
    }
    builder
}

fn nodes_builder(desired: &DesiredState) -> ClusterNodesBuilder {
    let mut nodes = ClusterNodesBuilder::new();
    if let Some(compute) = desired.compute_nodes {
        nodes = nodes.compute(compute);
    }
    if let Some(machine_type) = &desired.compute_machine_type {
        nodes = nodes.compute_machine_type(machine_type.clone());
    }
    if let Some(zones) = &desired.availability_zones {
        nodes = nodes.availability_zones(zones.iter().cloned());
    }
    if desired.autoscaling_enabled == Some(true) {
        nodes = nodes.autoscale_compute(autoscaling_builder(
            desired.min_replicas,
            desired.max_replicas,
        ));
    }
    nodes
}

fn aws_builder(desired: &DesiredState) -> AwsBuilder {
    let mut aws = AwsBuilder::new();
    if let Some(account_id) = &desired.aws_account_id {
        aws = aws.account_id(account_id.clone());
    }
    if let Some(access_key_id) = &desired.aws_access_key_id {
        aws = aws.access_key_id(access_key_id.clone());
    }
    if let Some(secret_access_key) = &desired.aws_secret_access_key {
        aws = aws.secret_access_key(secret_access_key.clone());
    }
    if let Some(subnet_ids) = &desired.aws_subnet_ids {
        aws = aws.subnet_ids(subnet_ids.iter().cloned());
    }
    if let Some(private_link) = desired.aws_private_link {
        aws = aws.private_link(private_link);
    }
    if let Some(sts) = &desired.sts {
        let sts = sts_builder(sts);
        if !sts.is_empty() {
            aws = aws.sts(sts);
        }
    }
    aws
}

fn sts_builder(sts: &StsSettings) -> StsBuilder {
    let mut builder = StsBuilder::new();
    if let Some(role_arn) = &sts.role_arn {
        builder = builder.role_arn(role_arn.clone());
    }
    if let Some(support_role_arn) = &sts.support_role_arn {
        builder = builder.support_role_arn(support_role_arn.clone());
    }
    if let Some(roles) = &sts.instance_iam_roles {
        let mut instance_roles = InstanceIamRolesBuilder::new();
        if let Some(master) = &roles.master_role_arn {
            instance_roles = instance_roles.master_role_arn(master.clone());
        }
        if let Some(worker) = &roles.worker_role_arn {
            instance_roles = instance_roles.worker_role_arn(worker.clone());
        }
        if !instance_roles.is_empty() {
            builder = builder.instance_iam_roles(instance_roles);
        }
    }
    if let Some(prefix) = &sts.operator_role_prefix {
        builder = builder.operator_role_prefix(prefix.clone());
    }
    builder
}

fn network_builder(desired: &DesiredState) -> NetworkBuilder {
    let mut network = NetworkBuilder::new();
    if let Some(machine_cidr) = &desired.machine_cidr {
        network = network.machine_cidr(machine_cidr.clone());
    }
    if let Some(service_cidr) = &desired.service_cidr {
        network = network.service_cidr(service_cidr.clone());
    }
    if let Some(pod_cidr) = &desired.pod_cidr {
        network = network.pod_cidr(pod_cidr.clone());
    }
    if let Some(host_prefix) = desired.host_prefix {
        network = network.host_prefix(host_prefix);
    }
    network
}

//! Cluster → ObservedState

use super::StateMapper;
use crate::error::ReconcilerError;
use crate::state::{InstanceIamRoleSettings, ObservedState, ProxySettings, StsSettings};
use clusters_client::{
    Aws, Ccs, Cluster, ClusterApi, ClusterConsole, ClusterNodes, Dns, Network, ObjectReference,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const HTTPS_PREFIX: &str = "https://";

impl StateMapper {
    /// Assign every field of `state` from `object`
    ///
    /// Fields absent on `object` become `None`, with two exceptions the remote
    /// system never echoes back: the AWS account id and a caller-chosen
    /// operator role prefix keep their current value.
    ///
    /// For STS clusters the OIDC thumbprint is resolved here. A failed
    /// resolution is logged and recorded as an empty thumbprint; it never
    /// fails the population.
    ///
    /// # Errors
    ///
    /// Returns `ReconcilerError::Cancelled` if `cancel` fires while the
    /// thumbprint is being resolved. All other fields are assigned by then.
    pub async fn populate(
        &self,
        object: &Cluster,
        state: &mut ObservedState,
        cancel: &CancellationToken,
    ) -> Result<(), ReconcilerError> {
        state.id = owned(object.get_id());
        state.external_id = owned(object.get_external_id());
        state.name = owned(object.get_name());
        state.cloud_provider = reference(object.get_cloud_provider());
        state.product = reference(object.get_product());
        state.cloud_region = reference(object.get_region());
        state.multi_az = object.get_multi_az();
        state.properties = object.get_properties().cloned();
        state.api_url = owned(object.get_api().and_then(ClusterApi::get_url));
        state.console_url = owned(object.get_console().and_then(ClusterConsole::get_url));
        state.domain = match (object.get_name(), object.get_dns().and_then(Dns::get_base_domain)) {
            (Some(name), Some(base_domain)) => Some(format!("{name}.{base_domain}")),
            _ => None,
        };
        state.ccs_enabled = object.get_ccs().and_then(Ccs::get_enabled);
        state.etcd_encryption = object.get_etcd_encryption();
        state.version = reference(object.get_version());
        state.state = object.get_state().map(|s| s.as_str().to_string());

        let nodes = object.get_nodes();
        state.compute_nodes = nodes.and_then(ClusterNodes::get_compute);
        state.compute_machine_type = reference(nodes.and_then(ClusterNodes::get_compute_machine_type));
        state.availability_zones = nodes
            .and_then(ClusterNodes::get_availability_zones)
            .map(<[String]>::to_vec);
        match nodes.and_then(ClusterNodes::get_autoscale_compute) {
            Some(autoscaling) => {
                state.autoscaling_enabled = Some(true);
                state.min_replicas = autoscaling.get_min_replicas();
                state.max_replicas = autoscaling.get_max_replicas();
            }
            None => {
                state.autoscaling_enabled = Some(false);
                state.min_replicas = None;
                state.max_replicas = None;
            }
        }

        let network = object.get_network();
        state.machine_cidr = owned(network.and_then(Network::get_machine_cidr));
        state.service_cidr = owned(network.and_then(Network::get_service_cidr));
        state.pod_cidr = owned(network.and_then(Network::get_pod_cidr));
        state.host_prefix = network.and_then(Network::get_host_prefix);

        state.proxy = object.get_proxy().map(|proxy| ProxySettings {
            http_proxy: owned(proxy.get_http_proxy()),
            https_proxy: owned(proxy.get_https_proxy()),
            no_proxy: owned(proxy.get_no_proxy()),
        });

        let aws = object.get_aws();
        if let Some(account_id) = aws.and_then(Aws::get_account_id) {
            state.aws_account_id = Some(account_id.to_string());
        }
        state.aws_access_key_id = owned(aws.and_then(Aws::get_access_key_id));
        state.aws_secret_access_key = owned(aws.and_then(Aws::get_secret_access_key));
        state.aws_subnet_ids = aws.and_then(Aws::get_subnet_ids).map(<[String]>::to_vec);
        state.aws_private_link = aws.and_then(Aws::get_private_link);

        let Some(sts) = aws.and_then(Aws::get_sts) else {
            state.sts = None;
            return Ok(());
        };

        let caller_prefix = state
            .sts
            .as_ref()
            .and_then(|current| current.operator_role_prefix.clone());
        let oidc_endpoint_url = sts
            .get_oidc_endpoint_url()
            .map(|url| url.strip_prefix(HTTPS_PREFIX).unwrap_or(url).to_string());
        let endpoint = oidc_endpoint_url.clone().unwrap_or_default();

        let mut settings = StsSettings {
            role_arn: owned(sts.get_role_arn()),
            support_role_arn: owned(sts.get_support_role_arn()),
            instance_iam_roles: sts.get_instance_iam_roles().map(|roles| InstanceIamRoleSettings {
                master_role_arn: owned(roles.get_master_role_arn()),
                worker_role_arn: owned(roles.get_worker_role_arn()),
            }),
            operator_role_prefix: caller_prefix.or_else(|| owned(sts.get_operator_role_prefix())),
            oidc_endpoint_url,
            thumbprint: Some(String::new()),
        };

        let resolved = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            result = self.resolver.resolve(&endpoint) => Some(result),
        };
        match resolved {
            Some(Ok(thumbprint)) => {
                debug!("Resolved OIDC thumbprint for cluster {}", object.id());
                settings.thumbprint = Some(thumbprint);
            }
            Some(Err(e)) => {
                warn!(
                    "Can't resolve OIDC thumbprint of '{}' for cluster {}: {}",
                    endpoint,
                    object.id(),
                    e
                );
            }
            None => {
                state.sts = Some(settings);
                return Err(ReconcilerError::Cancelled {
                    operation: "resolve thumbprint",
                });
            }
        }
        state.sts = Some(settings);

        Ok(())
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

fn reference(value: Option<&ObjectReference>) -> Option<String> {
    owned(value.and_then(ObjectReference::get_id))
}

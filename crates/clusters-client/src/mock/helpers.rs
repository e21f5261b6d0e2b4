//! Helper functions for the mock cluster service

use crate::error::ClusterError;
use crate::models::*;

/// Fill in the fields the service computes when it accepts a new cluster
pub(crate) fn accept_new_cluster(
    cluster: &Cluster,
    id: &str,
    base_domain: &str,
    state: ClusterState,
) -> Cluster {
    let mut accepted = cluster.clone();
    let name = cluster.name();

    accepted.id = Some(id.to_string());
    accepted.external_id = Some(format!("ext-{id}"));
    accepted.state = Some(state);
    accepted.dns = Some(Dns {
        base_domain: Some(base_domain.to_string()),
    });
    accepted.console = Some(ClusterConsole {
        url: Some(format!("https://console-openshift-console.apps.{name}.{base_domain}")),
    });

    let mut api = accepted.api.take().unwrap_or_default();
    api.url = Some(format!("https://api.{name}.{base_domain}:6443"));
    accepted.api = Some(api);

    if let Some(sts) = accepted.aws.as_mut().and_then(|aws| aws.sts.as_mut()) {
        sts.oidc_endpoint_url = Some(format!("https://oidc.{base_domain}/{id}"));
    }

    accepted
}

/// Apply a partial update: every field present on `patch` replaces the stored
/// value, nested structures are merged recursively.
pub fn merge_patch(existing: &Cluster, patch: &Cluster) -> Cluster {
    let mut merged = existing.clone();

    if patch.name.is_some() {
        merged.name.clone_from(&patch.name);
    }
    if patch.multi_az.is_some() {
        merged.multi_az = patch.multi_az;
    }
    if patch.properties.is_some() {
        merged.properties.clone_from(&patch.properties);
    }
    if patch.etcd_encryption.is_some() {
        merged.etcd_encryption = patch.etcd_encryption;
    }
    if patch.proxy.is_some() {
        merged.proxy.clone_from(&patch.proxy);
    }
    if patch.network.is_some() {
        merged.network.clone_from(&patch.network);
    }
    if patch.version.is_some() {
        merged.version.clone_from(&patch.version);
    }
    if let Some(patch_nodes) = &patch.nodes {
        let mut nodes = merged.nodes.take().unwrap_or_default();
        if patch_nodes.compute.is_some() {
            nodes.compute = patch_nodes.compute;
        }
        if patch_nodes.compute_machine_type.is_some() {
            nodes.compute_machine_type.clone_from(&patch_nodes.compute_machine_type);
        }
        if patch_nodes.availability_zones.is_some() {
            nodes.availability_zones.clone_from(&patch_nodes.availability_zones);
        }
        if patch_nodes.autoscale_compute.is_some() {
            nodes.autoscale_compute = patch_nodes.autoscale_compute;
        }
        merged.nodes = Some(nodes);
    }
    if let Some(patch_aws) = &patch.aws {
        let mut aws = merged.aws.take().unwrap_or_default();
        if patch_aws.subnet_ids.is_some() {
            aws.subnet_ids.clone_from(&patch_aws.subnet_ids);
        }
        if patch_aws.private_link.is_some() {
            aws.private_link = patch_aws.private_link;
        }
        merged.aws = Some(aws);
    }

    merged
}

/// Parse a search expression of the form `<field> is '<value>'`
///
/// Only `name` and `id` are supported, which is all the reconciler issues.
pub fn parse_search(search: &str) -> Result<(String, String), ClusterError> {
    let invalid = || ClusterError::InvalidRequest(format!("Unsupported search expression: {search}"));

    let (field, rest) = search.split_once(" is ").ok_or_else(invalid)?;
    let field = field.trim();
    if field != "name" && field != "id" {
        return Err(invalid());
    }
    let value = rest
        .trim()
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .ok_or_else(invalid)?;

    Ok((field.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::*;

    #[test]
    fn test_merge_patch_only_touches_present_fields() {
        let existing = ClusterBuilder::new()
            .id("1")
            .name("my-cluster")
            .nodes(
                ClusterNodesBuilder::new()
                    .compute(3)
                    .compute_machine_type("m5.xlarge"),
            )
            .build();
        let patch = ClusterBuilder::new()
            .nodes(ClusterNodesBuilder::new().compute(5))
            .build();

        let merged = merge_patch(&existing, &patch);
        let nodes = merged.get_nodes().unwrap();
        assert_eq!(nodes.get_compute(), Some(5));
        assert_eq!(
            nodes.get_compute_machine_type().and_then(ObjectReference::get_id),
            Some("m5.xlarge")
        );
        assert_eq!(merged.name(), "my-cluster");
    }

    #[test]
    fn test_parse_search() {
        assert_eq!(
            parse_search("name is 'my-cluster'").unwrap(),
            ("name".to_string(), "my-cluster".to_string())
        );
        assert!(parse_search("state is 'ready'").is_err());
        assert!(parse_search("name = my-cluster").is_err());
    }
}

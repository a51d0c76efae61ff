//! Sparse container resource patches for `k8s/updateDeployment`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model::{Container, Deployment, ResourceRequirements};
use crate::error::NodeError;

/// Resource keys a scale request may carry
pub const RESOURCE_KEYS: [&str; 2] = ["cpu", "memory"];

/// Which container of a deployment to patch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerSelector {
    /// Only valid for single-container deployments
    #[default]
    First,
    Named(String),
}

impl ContainerSelector {
    /// Selection carried by the deployment's `containerName` field
    ///
    /// Without one, a deployment with several containers has no target.
    pub fn for_deployment(deployment: &Deployment) -> Result<Self, NodeError> {
        let count = deployment.deployment_spec.template.spec.containers.len();
        match &deployment.container_name {
            Some(name) => Ok(ContainerSelector::Named(name.clone())),
            None if count <= 1 => Ok(ContainerSelector::First),
            None => Err(NodeError::Hydrator(format!(
                "deployment '{}' has {count} containers; set containerName to choose one",
                deployment.name
            ))),
        }
    }
}

/// One `containerResources` entry of an update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerResources {
    pub container_name: String,
    pub resources: ResourceRequirements,
}

/// Build the patch for the selected container from its current resources
///
/// Limits and requests are restricted to cpu and memory; keys the container
/// does not set are left out rather than invented.
pub fn patch_container_resources(
    deployment: &Deployment,
    selector: &ContainerSelector,
) -> Result<ContainerResources, NodeError> {
    let container = select(deployment, selector)?;

    Ok(ContainerResources {
        container_name: container.name.clone(),
        resources: ResourceRequirements {
            limits: scaled(&container.resources.limits),
            requests: scaled(&container.resources.requests),
        },
    })
}

fn select<'a>(
    deployment: &'a Deployment,
    selector: &ContainerSelector,
) -> Result<&'a Container, NodeError> {
    let containers = &deployment.deployment_spec.template.spec.containers;
    let found = match selector {
        ContainerSelector::First => containers.first(),
        ContainerSelector::Named(name) => containers.iter().find(|c| &c.name == name),
    };

    found.ok_or_else(|| {
        let wanted = match selector {
            ContainerSelector::First => "any container".to_string(),
            ContainerSelector::Named(name) => format!("container '{name}'"),
        };
        NodeError::Hydrator(format!(
            "deployment '{}' has no {wanted} ({} declared)",
            deployment.name,
            containers.len()
        ))
    })
}

fn scaled(quantities: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    quantities
        .iter()
        .filter(|(key, _)| RESOURCE_KEYS.contains(&key.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn deployment() -> Deployment {
        serde_json::from_value(json!({
            "cluster": "prod",
            "namespace": "default",
            "name": "api",
            "deploymentSpec": {"template": {"spec": {"containers": [
                {"name": "web", "resources": {
                    "limits": {"cpu": "2", "memory": "1Gi", "nvidia.com/gpu": "1"},
                    "requests": {"cpu": "500m"}
                }},
                {"name": "envoy", "resources": {"limits": {"cpu": "250m"}}}
            ]}}}
        }))
        .unwrap()
    }

    #[test]
    fn first_container_keeps_cpu_and_memory_only() {
        let patch = patch_container_resources(&deployment(), &ContainerSelector::First).unwrap();
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({
                "containerName": "web",
                "resources": {
                    "limits": {"cpu": "2", "memory": "1Gi"},
                    "requests": {"cpu": "500m"}
                }
            })
        );
    }

    #[test]
    fn selects_by_name() {
        let patch =
            patch_container_resources(&deployment(), &ContainerSelector::Named("envoy".into()))
                .unwrap();
        assert_eq!(patch.container_name, "envoy");
        assert_eq!(patch.resources.limits.get("cpu").map(String::as_str), Some("250m"));
    }

    #[test]
    fn selection_comes_from_container_name() {
        let mut d = deployment();
        assert!(matches!(
            ContainerSelector::for_deployment(&d),
            Err(NodeError::Hydrator(msg)) if msg.contains("2 containers")
        ));

        d.container_name = Some("envoy".into());
        assert_eq!(
            ContainerSelector::for_deployment(&d).unwrap(),
            ContainerSelector::Named("envoy".into())
        );

        d.container_name = None;
        d.deployment_spec.template.spec.containers.truncate(1);
        assert_eq!(
            ContainerSelector::for_deployment(&d).unwrap(),
            ContainerSelector::First
        );
    }

    #[test]
    fn missing_container_is_hydrator_error() {
        let err = patch_container_resources(&deployment(), &ContainerSelector::Named("db".into()))
            .unwrap_err();
        assert!(matches!(err, NodeError::Hydrator(msg) if msg.contains("'db'")));

        let empty = Deployment {
            name: "bare".into(),
            ..Default::default()
        };
        assert!(patch_container_resources(&empty, &ContainerSelector::First).is_err());
    }
}

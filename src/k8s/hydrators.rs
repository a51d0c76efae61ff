//! Hydrators that turn edited k8s resources into update requests
//!
//! Each takes `[resource, resolverInput]` as dependencies.

use std::sync::Arc;

use serde_json::{json, Value};

use super::model::{self, Deployment, HorizontalAutoscaler, Pod, ResolverInput};
use super::patch::{patch_container_resources, ContainerSelector};
use crate::error::NodeError;
use crate::hydrator::{dependency, Hydration, Hydrator};
use crate::transport::UpdateRequest;

pub const UPDATE_DEPLOYMENT: &str = "k8s/updateDeployment";
pub const RESIZE_HPA: &str = "k8s/resizeHPA";
pub const DELETE_POD: &str = "k8s/deletePod";

/// `k8s/updateDeployment` with the selected container's resources
pub fn update_deployment() -> Arc<dyn Hydrator> {
    Arc::new(|deps: &[Value]| -> Result<Hydration, NodeError> {
        let deployment: Deployment = dependency(deps, 0, "deployment")?;
        let input: ResolverInput = dependency(deps, 1, "resolver input")?;
        let selector = ContainerSelector::for_deployment(&deployment)?;
        let patch = patch_container_resources(&deployment, &selector)?;

        Ok(Hydration::Call(UpdateRequest::new(
            UPDATE_DEPLOYMENT,
            model::target(&deployment.cluster, &deployment.namespace, &deployment.name, &input),
            json!({ "containerResources": [patch] }),
        )))
    })
}

/// `k8s/resizeHPA` with the edited min/max replicas
pub fn resize_hpa() -> Arc<dyn Hydrator> {
    Arc::new(|deps: &[Value]| -> Result<Hydration, NodeError> {
        let hpa: HorizontalAutoscaler = dependency(deps, 0, "autoscaler")?;
        let input: ResolverInput = dependency(deps, 1, "resolver input")?;

        let sizing = &hpa.sizing;
        if sizing.min_replicas > sizing.max_replicas {
            return Err(NodeError::Hydrator(format!(
                "minReplicas ({}) exceeds maxReplicas ({})",
                sizing.min_replicas, sizing.max_replicas
            )));
        }

        Ok(Hydration::Call(UpdateRequest::new(
            RESIZE_HPA,
            model::target(&hpa.cluster, &hpa.namespace, &hpa.name, &input),
            json!({ "sizing": { "min": sizing.min_replicas, "max": sizing.max_replicas } }),
        )))
    })
}

/// `k8s/deletePod`; the request carries only the pod identity
pub fn delete_pod() -> Arc<dyn Hydrator> {
    Arc::new(|deps: &[Value]| -> Result<Hydration, NodeError> {
        let pod: Pod = dependency(deps, 0, "pod")?;
        let input: ResolverInput = dependency(deps, 1, "resolver input")?;

        Ok(Hydration::Call(UpdateRequest::new(
            DELETE_POD,
            model::target(&pod.cluster, &pod.namespace, &pod.name, &input),
            json!({}),
        )))
    })
}

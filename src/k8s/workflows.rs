//! K8s workflow catalogue: layouts and steps for each wizard

use std::sync::Arc;

use super::hydrators;
use crate::error::{Result, WizardError};
use crate::layout::LayoutBuilder;
use crate::node::NodeDecl;
use crate::transport::Transport;
use crate::wizard::{StepSpec, WizardStepController};

pub const SCALE_RESOURCES: &str = "scaleResources";
pub const RESIZE_HPA: &str = "resizeHPA";
pub const DELETE_POD: &str = "deletePod";

/// Node holding the resolver's query input in every k8s layout
pub const RESOLVER_INPUT: &str = "resolverInput";

/// Editable field of `resourceData` naming the container to scale
pub const CONTAINER_NAME: &str = "containerName";

/// Catalogue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowInfo {
    pub key: &'static str,
    /// Route below the `k8s` group
    pub path: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    /// Resolver type used when the configuration names none
    pub default_resolver_type: &'static str,
}

pub static CATALOGUE: [WorkflowInfo; 3] = [
    WorkflowInfo {
        key: DELETE_POD,
        path: "pod/delete",
        display_name: "Delete Pod",
        description: "Delete a K8s pod.",
        default_resolver_type: "clutch.k8s.v1.Pod",
    },
    WorkflowInfo {
        key: RESIZE_HPA,
        path: "hpa/resize",
        display_name: "Resize HPA",
        description: "Resize a horizontal autoscaler.",
        default_resolver_type: "clutch.k8s.v1.HPA",
    },
    WorkflowInfo {
        key: SCALE_RESOURCES,
        path: "deployment/scale",
        display_name: "Scale Resources",
        description: "Change the CPU and memory of a deployment's container.",
        default_resolver_type: "clutch.k8s.v1.Deployment",
    },
];

/// Look up a workflow by key or route path
pub fn find(key: &str) -> Result<&'static WorkflowInfo> {
    CATALOGUE
        .iter()
        .find(|w| w.key.eq_ignore_ascii_case(key) || w.path == key)
        .ok_or_else(|| WizardError::UnknownWorkflow {
            key: key.to_string(),
        })
}

/// A catalogue workflow ready to be instantiated
#[derive(Debug, Clone)]
pub struct WorkflowDefinition {
    pub info: &'static WorkflowInfo,
    pub nodes: Vec<NodeDecl>,
    pub steps: Vec<StepSpec>,
    /// Root node receiving the resolved resource
    pub resource_node: &'static str,
    /// Derived node whose hydration performs the update
    pub action_node: &'static str,
}

impl WorkflowDefinition {
    /// Build the layout and its step controller
    pub fn into_wizard(self, transport: Arc<dyn Transport>) -> Result<WizardStepController> {
        let graph = self
            .nodes
            .into_iter()
            .fold(LayoutBuilder::new(), LayoutBuilder::node)
            .build(transport)?;
        WizardStepController::new(graph, self.steps)
    }
}

/// Layout and steps of a catalogue workflow
pub fn definition(key: &str) -> Result<WorkflowDefinition> {
    let info = find(key)?;
    Ok(match info.key {
        SCALE_RESOURCES => scale_resources(info),
        RESIZE_HPA => resize_hpa(info),
        DELETE_POD => delete_pod(info),
        other => {
            return Err(WizardError::UnknownWorkflow {
                key: other.to_string(),
            })
        }
    })
}

/// Lookup -> Modify -> Confirmation, updating one container's resources
///
/// The container is chosen by the editable `containerName` field; it may be
/// left unset for single-container deployments.
pub fn scale_resources(info: &'static WorkflowInfo) -> WorkflowDefinition {
    const CONTAINERS: &str = "deploymentSpec.template.spec.containers[*].resources";

    let quantities = ["limits", "requests"].into_iter().flat_map(|kind| {
        ["cpu", "memory"]
            .into_iter()
            .map(move |key| format!("{CONTAINERS}.{kind}.{key}"))
    });
    let editable = std::iter::once(CONTAINER_NAME.to_string()).chain(quantities);

    WorkflowDefinition {
        info,
        nodes: vec![
            NodeDecl::root(RESOLVER_INPUT),
            NodeDecl::root("resourceData").editable(editable),
            NodeDecl::derived(
                "updateData",
                ["resourceData", RESOLVER_INPUT],
                hydrators::update_deployment(),
            ),
        ],
        steps: vec![
            StepSpec::new("Lookup"),
            StepSpec::new("Modify").backed_by("resourceData"),
            StepSpec::new("Confirmation").backed_by("updateData"),
        ],
        resource_node: "resourceData",
        action_node: "updateData",
    }
}

/// Lookup -> Modify -> Confirmation, changing min/max replicas
pub fn resize_hpa(info: &'static WorkflowInfo) -> WorkflowDefinition {
    WorkflowDefinition {
        info,
        nodes: vec![
            NodeDecl::root(RESOLVER_INPUT),
            NodeDecl::root("hpaData").editable(["sizing.minReplicas", "sizing.maxReplicas"]),
            NodeDecl::derived(
                "resizeData",
                ["hpaData", RESOLVER_INPUT],
                hydrators::resize_hpa(),
            ),
        ],
        steps: vec![
            StepSpec::new("Lookup"),
            StepSpec::new("Modify").backed_by("hpaData"),
            StepSpec::new("Confirmation").backed_by("resizeData"),
        ],
        resource_node: "hpaData",
        action_node: "resizeData",
    }
}

/// Lookup -> Confirm -> Result
pub fn delete_pod(info: &'static WorkflowInfo) -> WorkflowDefinition {
    WorkflowDefinition {
        info,
        nodes: vec![
            NodeDecl::root(RESOLVER_INPUT),
            NodeDecl::root("podData"),
            NodeDecl::derived(
                "deletionData",
                ["podData", RESOLVER_INPUT],
                hydrators::delete_pod(),
            ),
        ],
        steps: vec![
            StepSpec::new("Lookup"),
            StepSpec::new("Confirm").backed_by("podData"),
            StepSpec::new("Result").backed_by("deletionData"),
        ],
        resource_node: "podData",
        action_node: "deletionData",
    }
}

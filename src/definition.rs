//! YAML layout definitions and the hydrator registry
//!
//! ```yaml
//! nodes:
//!   - name: resolverInput
//!   - name: resourceData
//!     editable: ["deploymentSpec.template.spec.containers[*].resources.limits.cpu"]
//!   - name: updateData
//!     deps: [resourceData, resolverInput]
//!     hydrator: k8s.updateDeployment
//! steps:
//!   - name: Lookup
//!   - name: Modify
//!     backing: resourceData
//!   - name: Confirmation
//!     backing: updateData
//! ```

use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::dag::validate::validate_layout;
use crate::error::{Result, WizardError};
use crate::hydrator::Hydrator;
use crate::k8s::hydrators;
use crate::layout::LayoutBuilder;
use crate::node::NodeDecl;
use crate::transport::Transport;
use crate::wizard::{StepSpec, WizardStepController};

/// Hydrators addressable by name from a layout file
#[derive(Clone, Default)]
pub struct HydratorRegistry {
    hydrators: FxHashMap<String, Arc<dyn Hydrator>>,
}

impl HydratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the k8s update hydrators
    pub fn with_k8s() -> Self {
        let mut registry = Self::new();
        registry.register(
            "k8s.updateDeployment",
            hydrators::update_deployment(),
        );
        registry.register("k8s.resizeHPA", hydrators::resize_hpa());
        registry.register("k8s.deletePod", hydrators::delete_pod());
        registry
    }

    /// Register (or replace) a hydrator
    pub fn register(&mut self, name: impl Into<String>, hydrator: Arc<dyn Hydrator>) -> &mut Self {
        self.hydrators.insert(name.into(), hydrator);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Hydrator>> {
        self.hydrators.get(name).cloned()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.hydrators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for HydratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HydratorRegistry")
            .field("hydrators", &self.names())
            .finish()
    }
}

/// Node entry of a layout file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hydrator: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub editable: Vec<String>,
}

/// Parsed layout file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutDefinition {
    pub nodes: Vec<NodeDefinition>,
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

/// Counts reported by a successful validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSummary {
    pub roots: usize,
    pub derived: usize,
    pub steps: usize,
}

impl LayoutDefinition {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Resolve hydrator names into node declarations
    pub fn to_decls(&self, registry: &HydratorRegistry) -> Result<Vec<NodeDecl>> {
        self.nodes
            .iter()
            .map(|node| -> Result<NodeDecl> {
                let hydrator = match &node.hydrator {
                    Some(name) => Some(registry.get(name).ok_or_else(|| {
                        WizardError::UnknownHydrator {
                            node: node.name.clone(),
                            hydrator: name.clone(),
                        }
                    })?),
                    None => None,
                };
                Ok(NodeDecl {
                    name: node.name.clone(),
                    dependencies: node.deps.clone(),
                    hydrator,
                    editable: node.editable.clone(),
                })
            })
            .collect()
    }

    pub fn builder(&self, registry: &HydratorRegistry) -> Result<LayoutBuilder> {
        Ok(self
            .to_decls(registry)?
            .into_iter()
            .fold(LayoutBuilder::new(), LayoutBuilder::node))
    }

    /// Check nodes, hydrator names and step backing nodes without building
    pub fn validate(&self, registry: &HydratorRegistry) -> Result<LayoutSummary> {
        let (defs, graph) = validate_layout(self.to_decls(registry)?)?;

        for step in &self.steps {
            if let Some(node) = &step.backing {
                if !graph.contains(node) {
                    return Err(WizardError::UnknownBackingNode {
                        step: step.name.clone(),
                        node: node.clone(),
                    });
                }
            }
        }

        let derived = defs.iter().filter(|d| d.hydrator.is_some()).count();
        Ok(LayoutSummary {
            roots: defs.len() - derived,
            derived,
            steps: self.steps.len(),
        })
    }

    /// Build the graph and a controller over the declared steps
    pub fn build_wizard(
        &self,
        registry: &HydratorRegistry,
        transport: Arc<dyn Transport>,
    ) -> Result<WizardStepController> {
        let graph = self.builder(registry)?.build(transport)?;
        WizardStepController::new(graph, self.steps.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    const SCALE: &str = r#"
nodes:
  - name: resolverInput
  - name: resourceData
    editable: ["deploymentSpec.template.spec.containers[*].resources.limits.cpu"]
  - name: updateData
    deps: [resourceData, resolverInput]
    hydrator: k8s.updateDeployment
steps:
  - name: Lookup
  - name: Modify
    backing: resourceData
  - name: Confirmation
    backing: updateData
"#;

    #[test]
    fn parses_and_validates_scale_layout() {
        let def = LayoutDefinition::from_yaml(SCALE).unwrap();
        let summary = def.validate(&HydratorRegistry::with_k8s()).unwrap();
        assert_eq!(
            summary,
            LayoutSummary {
                roots: 2,
                derived: 1,
                steps: 3
            }
        );
    }

    #[test]
    fn unknown_hydrator_is_rejected() {
        let def = LayoutDefinition::from_yaml(SCALE).unwrap();
        let err = def.validate(&HydratorRegistry::new()).unwrap_err();
        assert!(matches!(
            err,
            WizardError::UnknownHydrator { ref hydrator, .. } if hydrator == "k8s.updateDeployment"
        ));
    }

    #[test]
    fn forward_reference_is_rejected() {
        let yaml = r#"
nodes:
  - name: updateData
    deps: [resourceData]
    hydrator: k8s.deletePod
  - name: resourceData
"#;
        let def = LayoutDefinition::from_yaml(yaml).unwrap();
        assert!(matches!(
            def.validate(&HydratorRegistry::with_k8s()),
            Err(WizardError::ForwardDependency { .. })
        ));
    }

    #[test]
    fn unknown_fields_and_bad_backing_are_rejected() {
        assert!(matches!(
            LayoutDefinition::from_yaml("nodes:\n  - name: a\n    hydrate: x\n"),
            Err(WizardError::YamlParse(_))
        ));

        let def = LayoutDefinition::from_yaml(
            "nodes:\n  - name: a\nsteps:\n  - name: One\n    backing: b\n",
        )
        .unwrap();
        assert!(matches!(
            def.validate(&HydratorRegistry::new()),
            Err(WizardError::UnknownBackingNode { .. })
        ));
    }

    #[test]
    fn builds_a_wizard() {
        let def = LayoutDefinition::from_yaml(SCALE).unwrap();
        let wizard = def
            .build_wizard(&HydratorRegistry::with_k8s(), Arc::new(MockTransport::new()))
            .unwrap();
        assert_eq!(wizard.step_names(), vec!["Lookup", "Modify", "Confirmation"]);
    }

    #[test]
    fn registry_lists_sorted_names() {
        assert_eq!(
            HydratorRegistry::with_k8s().names(),
            vec!["k8s.deletePod", "k8s.resizeHPA", "k8s.updateDeployment"]
        );
    }
}

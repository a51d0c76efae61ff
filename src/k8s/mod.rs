//! # K8s Workflows
//!
//! Wizards built on the layout engine:
//!
//! | Key | Route | Update call |
//! |-----|-------|-------------|
//! | `scaleResources` | `deployment/scale` | `k8s/updateDeployment` |
//! | `resizeHPA` | `hpa/resize` | `k8s/resizeHPA` |
//! | `deletePod` | `pod/delete` | `k8s/deletePod` |
//!
//! Node values stay JSON; hydrators read them through the typed views in
//! [`model`].

pub mod hydrators;
pub mod model;
pub mod patch;
pub mod workflows;

pub use model::{Container, Deployment, HorizontalAutoscaler, Pod, ResolverInput, Sizing};
pub use patch::{patch_container_resources, ContainerResources, ContainerSelector};
pub use workflows::{definition, find, WorkflowDefinition, WorkflowInfo, CATALOGUE};

//! Wizflow - reactive data layouts and step controllers for guided workflows

pub mod config;
pub mod dag;
pub mod definition;
pub mod error;
pub mod event_log;
pub mod hydrator;
pub mod jsonpath;
pub mod k8s;
pub mod layout;
pub mod node;
pub mod resolver;
pub mod transport;
pub mod wizard;

pub use config::WizflowConfig;
pub use definition::{HydratorRegistry, LayoutDefinition, NodeDefinition};
pub use error::{FixSuggestion, LookupError, NodeError, TransportError, WizardError};
pub use event_log::{Event, EventKind, EventLog};
pub use hydrator::{Hydration, Hydrator};
pub use layout::{DataLayoutGraph, LayoutBuilder};
pub use node::{NodeDecl, NodeSnapshot};
pub use resolver::{resolve_unique, MockResolver, Resolution, Resolver, ResolverQuery};
pub use transport::{HttpTransport, MockTransport, Target, Transport, UpdateRequest};
pub use wizard::{Edit, StepSpec, StepView, SubmitOutcome, WizardStatus, WizardStepController};

//! Error types with fix suggestions
//!
//! `WizardError` is what the public API returns. Nodes store the narrower,
//! cloneable `NodeError` so every caller awaiting a coalesced hydration can
//! observe the same failure.

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// Failure of a resolver lookup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("no {resource_type} matched the query")]
    NotFound { resource_type: String },

    #[error("query for {resource_type} matched {count} resources, expected exactly one")]
    Ambiguous { resource_type: String, count: usize },

    #[error("resolver unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a mutating transport call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("upstream unavailable: {0}")]
    Unavailable(String),
}

/// Error recorded on a node after a failed hydration or lookup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("hydrator failed: {0}")]
    Hydrator(String),
}

/// All error variants are part of the public API.
#[derive(Error, Debug)]
pub enum WizardError {
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Layout construction (WIZ-010 to WIZ-016)
    // ─────────────────────────────────────────────────────────────
    #[error("WIZ-010: Node '{name}' is declared more than once")]
    DuplicateNode { name: String },

    #[error("WIZ-011: Node '{node}' depends on unknown node '{dependency}'")]
    UnknownDependency { node: String, dependency: String },

    #[error("WIZ-012: Node '{node}' depends on '{dependency}', which is declared after it")]
    ForwardDependency { node: String, dependency: String },

    #[error("WIZ-013: Invalid node name '{name}'")]
    InvalidNodeName { name: String },

    #[error("WIZ-014: Node '{node}' declares dependencies but no hydrator")]
    DependenciesWithoutHydrator { node: String },

    #[error("WIZ-015: Invalid editable path '{pattern}' on node '{node}'")]
    InvalidEditablePattern { node: String, pattern: String },

    #[error("WIZ-016: Unknown hydrator '{hydrator}' for node '{node}'")]
    UnknownHydrator { node: String, hydrator: String },

    // ─────────────────────────────────────────────────────────────
    // Node access (WIZ-020 to WIZ-025)
    // ─────────────────────────────────────────────────────────────
    #[error("WIZ-020: Node '{name}' not found in layout")]
    UnknownNode { name: String },

    #[error("WIZ-021: Node '{name}' has no hydrator")]
    NoHydrator { name: String },

    #[error("WIZ-022: Node '{node}' cannot hydrate: dependency '{dependency}' has no value yet")]
    DependencyNotReady { node: String, dependency: String },

    #[error("WIZ-023: Path '{path}' is not editable on node '{node}'")]
    PathNotEditable { node: String, path: String },

    #[error("WIZ-024: Cannot traverse '{segment}' on {value_type} (path '{full_path}')")]
    InvalidTraversal {
        segment: String,
        value_type: String,
        full_path: String,
    },

    #[error("WIZ-025: Path '{path}' is not supported (use a.b or a[0].b)")]
    PathUnsupported { path: String },

    // ─────────────────────────────────────────────────────────────
    // Hydration (WIZ-030)
    // ─────────────────────────────────────────────────────────────
    #[error("WIZ-030: Hydration of '{node}' failed: {source}")]
    Hydration {
        node: String,
        #[source]
        source: NodeError,
    },

    // ─────────────────────────────────────────────────────────────
    // Wizard (WIZ-040 to WIZ-042)
    // ─────────────────────────────────────────────────────────────
    #[error("WIZ-040: A wizard needs at least one step")]
    EmptyWizard,

    #[error("WIZ-041: Step '{step}' is backed by unknown node '{node}'")]
    UnknownBackingNode { step: String, node: String },

    #[error("WIZ-042: Wizard already completed")]
    WizardComplete,

    // ─────────────────────────────────────────────────────────────
    // Configuration / catalogue (WIZ-050 to WIZ-051)
    // ─────────────────────────────────────────────────────────────
    #[error("WIZ-050: Configuration error: {reason}")]
    ConfigError { reason: String },

    #[error("WIZ-051: Unknown workflow '{key}'")]
    UnknownWorkflow { key: String },
}

impl WizardError {
    /// The node error carried by a failed hydration, if any
    pub fn node_error(&self) -> Option<&NodeError> {
        match self {
            WizardError::Hydration { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl FixSuggestion for WizardError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            WizardError::YamlParse(_) => Some("Check YAML syntax: indentation and quoting"),
            WizardError::Io(_) => Some("Check file path and permissions"),
            WizardError::DuplicateNode { .. } => Some("Use unique node names in the layout"),
            WizardError::UnknownDependency { .. } => {
                Some("Declare the dependency as a node in the layout")
            }
            WizardError::ForwardDependency { .. } => {
                Some("Move the dependency above the node that uses it")
            }
            WizardError::InvalidNodeName { .. } => {
                Some("Node names start with a letter and use letters, digits, '_' or '-'")
            }
            WizardError::DependenciesWithoutHydrator { .. } => {
                Some("Add a hydrator or remove the deps: list")
            }
            WizardError::InvalidEditablePattern { .. } => {
                Some("Use paths like a.b, a[0].b or a[*].b")
            }
            WizardError::UnknownHydrator { .. } => {
                Some("Run `wizflow list` to see the registered hydrators")
            }
            WizardError::UnknownNode { .. } => Some("Verify the node name exists in the layout"),
            WizardError::NoHydrator { .. } => {
                Some("Only derived nodes can be hydrated; use assign for root nodes")
            }
            WizardError::DependencyNotReady { .. } => {
                Some("Populate the dependency (resolver or assign) before hydrating")
            }
            WizardError::PathNotEditable { .. } => {
                Some("Edit one of the node's declared editable paths")
            }
            WizardError::InvalidTraversal { .. } => {
                Some("Check the path - you're trying to access a field on a non-object value")
            }
            WizardError::PathUnsupported { .. } => {
                Some("Use simple paths like field.subfield or array[0].field")
            }
            WizardError::Hydration { .. } => Some("Correct the input and submit again"),
            WizardError::EmptyWizard => Some("Add at least one step"),
            WizardError::UnknownBackingNode { .. } => {
                Some("Back the step with a node declared in the layout")
            }
            WizardError::WizardComplete => Some("Reset the wizard to start another run"),
            WizardError::ConfigError { .. } => {
                Some("Check ~/.config/wizflow/config.toml and WIZFLOW_* variables")
            }
            WizardError::UnknownWorkflow { .. } => {
                Some("Run `wizflow list` to see the available workflows")
            }
        }
    }
}

pub type Result<T, E = WizardError> = std::result::Result<T, E>;

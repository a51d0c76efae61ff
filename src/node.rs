//! Data nodes: declarations, live state and read snapshots

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::NodeError;
use crate::hydrator::Hydrator;
use crate::jsonpath::PathPattern;

/// A node as declared by a layout, before validation
#[derive(Clone)]
pub struct NodeDecl {
    pub name: String,
    pub dependencies: Vec<String>,
    pub hydrator: Option<Arc<dyn Hydrator>>,
    pub editable: Vec<String>,
}

impl NodeDecl {
    /// Root node, populated by edits or resolver results
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            hydrator: None,
            editable: Vec::new(),
        }
    }

    /// Node derived from `dependencies` by `hydrator`
    pub fn derived<I, S>(name: impl Into<String>, dependencies: I, hydrator: Arc<dyn Hydrator>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            hydrator: Some(hydrator),
            editable: Vec::new(),
        }
    }

    /// Restrict `update_data` to these leaf path patterns
    pub fn editable<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.editable = patterns.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Debug for NodeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeDecl")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("hydrator", &self.hydrator.is_some())
            .field("editable", &self.editable)
            .finish()
    }
}

/// Validated, immutable part of a node
pub(crate) struct NodeDef {
    pub name: Arc<str>,
    pub dependencies: Vec<Arc<str>>,
    pub hydrator: Option<Arc<dyn Hydrator>>,
    pub editable: Vec<PathPattern>,
}

impl fmt::Debug for NodeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeDef")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("hydrator", &self.hydrator.is_some())
            .field("editable", &self.editable)
            .finish()
    }
}

/// Mutable part of a node, guarded by the graph lock
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeState {
    pub value: Option<Value>,
    pub is_loading: bool,
    pub error: Option<NodeError>,
    /// Bumped on every write to `value`
    pub revision: u64,
    /// Dependency revisions seen by the last successful derivation
    pub derived_from: Option<Vec<u64>>,
}

impl NodeState {
    pub fn store(&mut self, value: Value) {
        self.value = Some(value);
        self.is_loading = false;
        self.error = None;
        self.revision += 1;
    }

    pub fn clear(&mut self) {
        self.value = None;
        self.is_loading = false;
        self.error = None;
        self.derived_from = None;
        self.revision += 1;
    }
}

/// Point-in-time copy of a node, as a step would display it
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    pub name: Arc<str>,
    /// `None` until the node is first assigned or derived
    pub value: Option<Value>,
    pub is_loading: bool,
    pub error: Option<NodeError>,
    /// Dependencies changed since the last successful derivation
    pub stale: bool,
}

impl NodeSnapshot {
    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }
}

//! Dependency graph between data nodes (Arc<str> optimized)
//!
//! Nodes are added in declaration order and may only depend on nodes added
//! before them, so the graph is acyclic by construction.

pub mod validate;

use std::sync::Arc;

use rustc_hash::FxHashMap;

/// Graph of node dependencies built from layout declarations
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    /// node -> nodes derived from it
    successors: FxHashMap<Arc<str>, Vec<Arc<str>>>,
    /// All nodes in declaration order
    order: Vec<Arc<str>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node whose dependencies are already present
    pub(crate) fn add_node(&mut self, name: Arc<str>, dependencies: &[Arc<str>]) {
        for dep in dependencies {
            self.successors
                .entry(Arc::clone(dep))
                .or_default()
                .push(Arc::clone(&name));
        }
        self.successors.entry(Arc::clone(&name)).or_default();
        self.order.push(name);
    }

    /// Nodes that list `name` among their dependencies
    #[inline]
    pub fn dependents(&self, name: &str) -> &[Arc<str>] {
        static EMPTY: &[Arc<str>] = &[];
        self.successors
            .get(name)
            .map(|v| v.as_slice())
            .unwrap_or(EMPTY)
    }

    /// Nodes in declaration order
    pub fn order(&self) -> &[Arc<str>] {
        &self.order
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.successors.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc(s: &str) -> Arc<str> {
        Arc::from(s)
    }

    fn scale_graph() -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        graph.add_node(arc("resolverInput"), &[]);
        graph.add_node(arc("resourceData"), &[]);
        graph.add_node(arc("updateData"), &[arc("resourceData"), arc("resolverInput")]);
        graph.add_node(arc("summary"), &[arc("updateData")]);
        graph
    }

    #[test]
    fn dependents_in_declaration_order() {
        let graph = scale_graph();
        assert_eq!(graph.dependents("resourceData"), &[arc("updateData")]);
        assert_eq!(graph.dependents("updateData"), &[arc("summary")]);
        assert!(graph.dependents("summary").is_empty());
        assert!(graph.dependents("unknown").is_empty());
    }

    #[test]
    fn order_and_membership() {
        let graph = scale_graph();
        assert_eq!(
            graph.order(),
            &[arc("resolverInput"), arc("resourceData"), arc("updateData"), arc("summary")]
        );
        assert!(graph.contains("summary"));
        assert!(!graph.contains("ghost"));
    }
}

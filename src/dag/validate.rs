//! Layout validation
//!
//! Validates:
//! - node names (format, uniqueness)
//! - dependencies (exist, declared earlier, only on derived nodes)
//! - editable path patterns (minimal path subset plus `[*]`)

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;

use crate::error::WizardError;
use crate::jsonpath::PathPattern;
use crate::node::{NodeDecl, NodeDef};

use super::DependencyGraph;

/// Node names: letter first, then letters, digits, '_' or '-'
static NODE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("node name regex is valid"));

/// Validate declarations and build the dependency graph
pub(crate) fn validate_layout(
    decls: Vec<NodeDecl>,
) -> Result<(Vec<NodeDef>, DependencyGraph), WizardError> {
    let mut graph = DependencyGraph::new();
    let mut declared: FxHashSet<String> = FxHashSet::default();
    let mut defs = Vec::with_capacity(decls.len());

    let all_names: FxHashSet<&str> = decls.iter().map(|d| d.name.as_str()).collect();

    for decl in &decls {
        validate_name(&decl.name)?;

        if declared.contains(&decl.name) {
            return Err(WizardError::DuplicateNode {
                name: decl.name.clone(),
            });
        }

        if decl.hydrator.is_none() && !decl.dependencies.is_empty() {
            return Err(WizardError::DependenciesWithoutHydrator {
                node: decl.name.clone(),
            });
        }

        for dep in &decl.dependencies {
            validate_dependency(&decl.name, dep, &declared, &all_names)?;
        }

        let editable = decl
            .editable
            .iter()
            .map(|pattern| {
                PathPattern::parse(pattern).map_err(|_| WizardError::InvalidEditablePattern {
                    node: decl.name.clone(),
                    pattern: pattern.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let name: Arc<str> = Arc::from(decl.name.as_str());
        let dependencies: Vec<Arc<str>> = decl
            .dependencies
            .iter()
            .map(|d| Arc::from(d.as_str()))
            .collect();

        graph.add_node(Arc::clone(&name), &dependencies);
        declared.insert(decl.name.clone());
        defs.push(NodeDef {
            name,
            dependencies,
            hydrator: decl.hydrator.clone(),
            editable,
        });
    }

    Ok((defs, graph))
}

fn validate_name(name: &str) -> Result<(), WizardError> {
    if NODE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(WizardError::InvalidNodeName {
            name: name.to_string(),
        })
    }
}

/// A dependency must already be declared; a later or missing one is an error
fn validate_dependency(
    node: &str,
    dependency: &str,
    declared: &FxHashSet<String>,
    all_names: &FxHashSet<&str>,
) -> Result<(), WizardError> {
    if declared.contains(dependency) {
        return Ok(());
    }

    // Self-references and later declarations would allow cycles
    if dependency == node || all_names.contains(dependency) {
        return Err(WizardError::ForwardDependency {
            node: node.to_string(),
            dependency: dependency.to_string(),
        });
    }

    Err(WizardError::UnknownDependency {
        node: node.to_string(),
        dependency: dependency.to_string(),
    })
}

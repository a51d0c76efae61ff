//! DataLayoutGraph: the reactive node graph behind one wizard session
//!
//! Bookkeeping (`assign`, `update_data`, loading/error flags) happens under a
//! `parking_lot::Mutex` and never awaits. Hydrations run as spawned tasks
//! tracked in a `DashMap` of shared futures:
//! - a second `hydrate` of the same node joins the pending one
//! - a dropped caller does not cancel the hydration
//! - results that arrive after `reset()` are discarded (epoch check)

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{self, BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{json, Value};
use tracing::{debug, info_span, warn, Instrument};

use crate::dag::validate::validate_layout;
use crate::dag::DependencyGraph;
use crate::error::{NodeError, Result, WizardError};
use crate::event_log::{EventKind, EventLog};
use crate::hydrator::{Hydration, Hydrator};
use crate::jsonpath;
use crate::node::{NodeDecl, NodeDef, NodeSnapshot, NodeState};
use crate::transport::Transport;

type SharedHydration = Shared<BoxFuture<'static, std::result::Result<Value, NodeError>>>;

// ============================================================================
// BUILDER
// ============================================================================

/// Declares nodes in dependency order, then builds the graph
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    decls: Vec<NodeDecl>,
    events: Option<EventLog>,
}

impl LayoutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, decl: NodeDecl) -> Self {
        self.decls.push(decl);
        self
    }

    pub fn root(self, name: impl Into<String>) -> Self {
        self.node(NodeDecl::root(name))
    }

    pub fn derived<I, S>(self, name: impl Into<String>, dependencies: I, hydrator: Arc<dyn Hydrator>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node(NodeDecl::derived(name, dependencies, hydrator))
    }

    /// Record events into an existing log instead of a fresh one
    pub fn with_event_log(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    /// Validate the declarations and build the graph
    pub fn build(self, transport: Arc<dyn Transport>) -> Result<DataLayoutGraph> {
        let (defs, graph) = validate_layout(self.decls)?;

        let nodes = defs
            .iter()
            .map(|def| (Arc::clone(&def.name), NodeState::default()))
            .collect();
        let defs = defs
            .into_iter()
            .map(|def| (Arc::clone(&def.name), def))
            .collect();

        debug!(nodes = graph.order().len(), transport = transport.name(), "layout built");

        Ok(DataLayoutGraph {
            inner: Arc::new(GraphInner {
                defs,
                graph,
                state: Mutex::new(GraphState { epoch: 0, nodes }),
                inflight: DashMap::new(),
                attempts: AtomicU64::new(0),
                transport,
                events: self.events.unwrap_or_default(),
            }),
        })
    }
}

// ============================================================================
// GRAPH
// ============================================================================

struct GraphState {
    /// Bumped by `reset`; hydrations started in an older epoch are dropped
    epoch: u64,
    nodes: FxHashMap<Arc<str>, NodeState>,
}

struct GraphInner {
    defs: FxHashMap<Arc<str>, NodeDef>,
    graph: DependencyGraph,
    state: Mutex<GraphState>,
    /// node -> (attempt id, pending hydration)
    inflight: DashMap<Arc<str>, (u64, SharedHydration)>,
    attempts: AtomicU64,
    transport: Arc<dyn Transport>,
    events: EventLog,
}

/// Handle onto a layout graph; clones share the same nodes
#[derive(Clone)]
pub struct DataLayoutGraph {
    inner: Arc<GraphInner>,
}

/// What the spawned hydration task needs to settle its node
#[derive(Clone)]
struct Attempt {
    node: Arc<str>,
    id: u64,
    epoch: u64,
    /// Dependency revisions the hydrator saw
    revisions: Vec<u64>,
}

impl DataLayoutGraph {
    // ─────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────

    /// Point-in-time copy of a node
    pub fn get(&self, name: &str) -> Result<NodeSnapshot> {
        let def = self.def(name)?;
        let state = self.inner.state.lock();
        Ok(snapshot(def, &state))
    }

    pub fn value(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.get(name)?.value)
    }

    pub fn is_loading(&self, name: &str) -> Result<bool> {
        self.def(name)?;
        Ok(self.inner.state.lock().nodes.get(name).is_some_and(|n| n.is_loading))
    }

    pub fn error(&self, name: &str) -> Result<Option<NodeError>> {
        Ok(self.get(name)?.error)
    }

    /// Dependencies changed since the last successful derivation
    pub fn is_stale(&self, name: &str) -> Result<bool> {
        Ok(self.get(name)?.stale)
    }

    pub fn has_hydrator(&self, name: &str) -> Result<bool> {
        Ok(self.def(name)?.hydrator.is_some())
    }

    /// Derived node that is stale or holds an error
    pub fn needs_hydration(&self, name: &str) -> Result<bool> {
        let node = self.get(name)?;
        Ok(self.has_hydrator(name)? && (node.stale || node.error.is_some()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.defs.contains_key(name)
    }

    /// Node names in declaration order
    pub fn node_names(&self) -> &[Arc<str>] {
        self.inner.graph.order()
    }

    /// Nodes that declare `name` as a dependency
    pub fn dependents(&self, name: &str) -> Result<Vec<Arc<str>>> {
        self.def(name)?;
        Ok(self.inner.graph.dependents(name).to_vec())
    }

    pub fn event_log(&self) -> &EventLog {
        &self.inner.events
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    // ─────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────

    /// Overwrite a node's value, clearing loading and error
    pub fn assign(&self, name: &str, value: Value) -> Result<()> {
        let def = self.def(name)?;
        self.with_node(name, |node| node.store(value));
        self.inner.events.emit(EventKind::NodeAssigned {
            node: Arc::clone(&def.name),
        });
        Ok(())
    }

    /// Merge `value` at `path` into the node, keeping siblings
    ///
    /// Undefined nodes start from `{}`. Nothing changes on error.
    pub fn update_data(&self, name: &str, path: &str, value: Value) -> Result<()> {
        let def = self.def(name)?;
        let segments = jsonpath::parse(path)?;

        if !def.editable.is_empty() && !def.editable.iter().any(|p| p.matches(&segments)) {
            return Err(WizardError::PathNotEditable {
                node: name.to_string(),
                path: path.to_string(),
            });
        }

        {
            let mut state = self.inner.state.lock();
            let node = state
                .nodes
                .get_mut(name)
                .ok_or_else(|| unknown_node(name))?;
            let mut next = node.value.clone().unwrap_or_else(|| json!({}));
            jsonpath::set(&mut next, &segments, value)?;
            node.store(next);
        }

        self.inner.events.emit(EventKind::NodeUpdated {
            node: Arc::clone(&def.name),
            path: jsonpath::display(&segments),
            stale: self.inner.graph.dependents(name).to_vec(),
        });
        Ok(())
    }

    /// Flag a node as loading while something outside the graph (a
    /// resolver lookup) produces its value. Setting the flag clears the error.
    pub fn set_loading(&self, name: &str, loading: bool) -> Result<()> {
        self.def(name)?;
        self.with_node(name, |node| {
            node.is_loading = loading;
            if loading {
                node.error = None;
            }
        });
        Ok(())
    }

    /// Store an error on a node, keeping its value
    pub fn record_error(&self, name: &str, error: NodeError) -> Result<()> {
        let def = self.def(name)?;
        if let NodeError::Lookup(lookup) = &error {
            self.inner.events.emit(EventKind::LookupFailed {
                node: Arc::clone(&def.name),
                error: lookup.to_string(),
            });
        }
        self.with_node(name, |node| {
            node.is_loading = false;
            node.error = Some(error);
        });
        Ok(())
    }

    /// Clear every node and forget pending hydrations
    pub fn reset(&self) {
        {
            let mut state = self.inner.state.lock();
            state.epoch += 1;
            state.nodes.values_mut().for_each(NodeState::clear);
        }
        self.inner.inflight.clear();
        self.inner.events.emit(EventKind::LayoutReset);
        debug!("layout reset");
    }

    // ─────────────────────────────────────────────────────────────
    // Hydration
    // ─────────────────────────────────────────────────────────────

    /// Hydrate a derived node
    ///
    /// Starts immediately (the node is loading once this returns) and must
    /// be called from within a tokio runtime. The returned future resolves
    /// to the new value or to a `Hydration` error carrying the node error.
    /// A second call while one is pending joins it.
    pub fn hydrate(&self, name: &str) -> BoxFuture<'static, Result<Value>> {
        let node = name.to_string();
        match self.start_hydration(name) {
            Ok(pending) => async move {
                pending
                    .await
                    .map_err(|source| WizardError::Hydration { node, source })
            }
            .boxed(),
            Err(e) => future::ready(Err(e)).boxed(),
        }
    }

    fn start_hydration(&self, name: &str) -> Result<SharedHydration> {
        let def = self.def(name)?;
        let hydrator = def.hydrator.clone().ok_or_else(|| WizardError::NoHydrator {
            name: name.to_string(),
        })?;

        match self.inner.inflight.entry(Arc::clone(&def.name)) {
            Entry::Occupied(pending) => {
                debug!(node = name, "joining pending hydration");
                self.inner.events.emit(EventKind::HydrationCoalesced {
                    node: Arc::clone(&def.name),
                });
                Ok(pending.get().1.clone())
            }
            Entry::Vacant(slot) => {
                let (values, revisions, epoch) = self.begin(def)?;
                let attempt = Attempt {
                    node: Arc::clone(&def.name),
                    id: self.inner.attempts.fetch_add(1, Ordering::Relaxed),
                    epoch,
                    revisions,
                };

                self.inner.events.emit(EventKind::HydrationStarted {
                    node: Arc::clone(&def.name),
                    dependencies: def.dependencies.clone(),
                });

                let id = attempt.id;
                let pending = self.spawn_hydration(hydrator, values, attempt);
                slot.insert((id, pending.clone()));
                Ok(pending)
            }
        }
    }

    /// Check dependencies and flag the node as loading
    fn begin(&self, def: &NodeDef) -> Result<(Vec<Value>, Vec<u64>, u64)> {
        let mut state = self.inner.state.lock();

        let mut values = Vec::with_capacity(def.dependencies.len());
        let mut revisions = Vec::with_capacity(def.dependencies.len());
        for dep in &def.dependencies {
            match state.nodes.get(dep) {
                Some(NodeState {
                    value: Some(value),
                    revision,
                    ..
                }) => {
                    values.push(value.clone());
                    revisions.push(*revision);
                }
                _ => {
                    return Err(WizardError::DependencyNotReady {
                        node: def.name.to_string(),
                        dependency: dep.to_string(),
                    })
                }
            }
        }

        let epoch = state.epoch;
        let node = state
            .nodes
            .get_mut(&def.name)
            .ok_or_else(|| unknown_node(&def.name))?;
        node.is_loading = true;
        node.error = None;

        Ok((values, revisions, epoch))
    }

    fn spawn_hydration(
        &self,
        hydrator: Arc<dyn Hydrator>,
        values: Vec<Value>,
        attempt: Attempt,
    ) -> SharedHydration {
        let graph = self.clone();
        let span = info_span!("hydrate", node = %attempt.node, attempt = attempt.id);
        let started = Instant::now();

        let settled = attempt.clone();
        let task = tokio::spawn(
            async move {
                let outcome = match hydrator.hydrate(&values) {
                    Ok(Hydration::Ready(value)) => Ok(value),
                    Ok(Hydration::Call(request)) => {
                        graph.inner.events.emit(EventKind::TransportCalled {
                            node: Arc::clone(&attempt.node),
                            kind: request.kind.clone(),
                            target: request.target.name.clone(),
                        });
                        graph
                            .inner
                            .transport
                            .update(&request)
                            .await
                            .map_err(NodeError::from)
                    }
                    Err(e) => Err(e),
                };
                graph.settle(&attempt, &outcome, started.elapsed());
                outcome
            }
            .instrument(span),
        );

        let graph = self.clone();
        async move {
            match task.await {
                Ok(outcome) => outcome,
                // a panicking hydrator never reached `settle`
                Err(join_error) => {
                    let outcome = Err(NodeError::Hydrator(format!(
                        "hydration task failed: {join_error}"
                    )));
                    graph.settle(&settled, &outcome, started.elapsed());
                    outcome
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Write a finished hydration back, unless a reset intervened
    fn settle(
        &self,
        attempt: &Attempt,
        outcome: &std::result::Result<Value, NodeError>,
        elapsed: Duration,
    ) {
        let applied = {
            let mut state = self.inner.state.lock();
            let current = state.epoch == attempt.epoch;
            if current {
                if let Some(node) = state.nodes.get_mut(&attempt.node) {
                    match outcome {
                        Ok(value) => {
                            node.store(value.clone());
                            node.derived_from = Some(attempt.revisions.clone());
                        }
                        Err(error) => {
                            node.is_loading = false;
                            node.error = Some(error.clone());
                        }
                    }
                }
            }
            current
        };

        self.inner
            .inflight
            .remove_if(&attempt.node, |_, (id, _)| *id == attempt.id);

        let node = Arc::clone(&attempt.node);
        let duration_ms = elapsed.as_millis() as u64;
        let event = match (applied, outcome) {
            (false, _) => {
                debug!(node = %node, "discarding result from before reset");
                EventKind::HydrationDiscarded { node }
            }
            (true, Ok(_)) => {
                debug!(node = %node, duration_ms, "hydration completed");
                EventKind::HydrationCompleted { node, duration_ms }
            }
            (true, Err(error)) => {
                warn!(node = %node, %error, "hydration failed");
                EventKind::HydrationFailed {
                    node,
                    error: error.to_string(),
                    duration_ms,
                }
            }
        };
        self.inner.events.emit(event);
    }

    // ─────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────

    fn def(&self, name: &str) -> Result<&NodeDef> {
        self.inner.defs.get(name).ok_or_else(|| unknown_node(name))
    }

    fn with_node(&self, name: &str, f: impl FnOnce(&mut NodeState)) {
        if let Some(node) = self.inner.state.lock().nodes.get_mut(name) {
            f(node);
        }
    }
}

impl std::fmt::Debug for DataLayoutGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataLayoutGraph")
            .field("nodes", &self.inner.graph.order())
            .field("transport", &self.inner.transport.name())
            .field("inflight", &self.inner.inflight.len())
            .finish()
    }
}

fn snapshot(def: &NodeDef, state: &GraphState) -> NodeSnapshot {
    let node = state.nodes.get(&def.name).cloned().unwrap_or_default();
    let stale = def.hydrator.is_some() && {
        let current: Vec<u64> = def
            .dependencies
            .iter()
            .map(|dep| state.nodes.get(dep).map_or(0, |n| n.revision))
            .collect();
        node.derived_from.as_deref() != Some(current.as_slice())
    };

    NodeSnapshot {
        name: Arc::clone(&def.name),
        value: node.value,
        is_loading: node.is_loading,
        error: node.error,
        stale,
    }
}

fn unknown_node(name: &str) -> WizardError {
    WizardError::UnknownNode {
        name: name.to_string(),
    }
}

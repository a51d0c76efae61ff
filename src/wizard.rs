//! WizardStepController: ordered steps bound to a layout graph
//!
//! Each step may be *backed* by a node whose loading/error state it shows.
//! Edits are staged on the active step and committed by `on_submit`, which
//! hydrates the affected derived nodes and advances only when the next
//! step's backing node resolved without error. Submitting the last step
//! finishes the wizard; its backing node is hydrated again only when stale
//! or errored.
//!
//! The controller lock is never held across an await. A submit that finds
//! the position changed (back, reset, another submit) when its hydrations
//! finish reports `Superseded` and leaves the position alone.

use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::error::{NodeError, Result, WizardError};
use crate::event_log::EventKind;
use crate::layout::DataLayoutGraph;
use crate::node::NodeSnapshot;
use crate::resolver::{resolve_unique, Resolver, ResolverQuery};

// ============================================================================
// TYPES
// ============================================================================

/// Step declaration: a name and an optional backing node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSpec {
    pub name: String,
    #[serde(default)]
    pub backing: Option<String>,
}

impl StepSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backing: None,
        }
    }

    pub fn backed_by(mut self, node: impl Into<String>) -> Self {
        self.backing = Some(node.into());
        self
    }
}

/// Edit staged on the active step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    Assign { node: String, value: Value },
    Update { node: String, path: String, value: Value },
}

impl Edit {
    pub fn assign(node: impl Into<String>, value: Value) -> Self {
        Edit::Assign {
            node: node.into(),
            value,
        }
    }

    pub fn update(node: impl Into<String>, path: impl Into<String>, value: Value) -> Self {
        Edit::Update {
            node: node.into(),
            path: path.into(),
            value,
        }
    }

    pub fn node(&self) -> &str {
        match self {
            Edit::Assign { node, .. } | Edit::Update { node, .. } => node,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStatus {
    AtStep(usize),
    Done,
}

/// Result of a submit
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Advanced { from: usize, to: usize },
    /// Last step completed
    Done,
    /// A blocking hydration failed; position kept
    Blocked { node: Arc<str>, error: NodeError },
    /// A relevant node was loading; nothing happened
    Busy { node: Arc<str> },
    /// Position changed while hydrations were running
    Superseded,
}

/// What the active step would render
#[derive(Debug, Clone, PartialEq)]
pub struct StepView {
    pub index: usize,
    pub name: String,
    pub is_last: bool,
    pub backing: Option<NodeSnapshot>,
}

struct Step {
    name: String,
    backing: Option<Arc<str>>,
}

struct ControllerState {
    status: WizardStatus,
    /// Staged edits per step
    staged: Vec<Vec<Edit>>,
    /// Bumped whenever the position changes or the wizard resets
    token: u64,
}

/// Hydration triggered by a submit
struct Planned {
    node: Arc<str>,
    blocking: bool,
}

// ============================================================================
// CONTROLLER
// ============================================================================

pub struct WizardStepController {
    graph: DataLayoutGraph,
    steps: Vec<Step>,
    state: Mutex<ControllerState>,
}

impl WizardStepController {
    pub fn new(graph: DataLayoutGraph, steps: Vec<StepSpec>) -> Result<Self> {
        if steps.is_empty() {
            return Err(WizardError::EmptyWizard);
        }

        let steps = steps
            .into_iter()
            .map(|spec| -> Result<Step> {
                let backing = match spec.backing {
                    Some(node) => {
                        let name = graph
                            .node_names()
                            .iter()
                            .find(|n| n.as_ref() == node.as_str())
                            .cloned()
                            .ok_or_else(|| WizardError::UnknownBackingNode {
                                step: spec.name.clone(),
                                node,
                            })?;
                        Some(name)
                    }
                    None => None,
                };
                Ok(Step {
                    name: spec.name,
                    backing,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            state: Mutex::new(ControllerState {
                status: WizardStatus::AtStep(0),
                staged: vec![Vec::new(); steps.len()],
                token: 0,
            }),
            graph,
            steps,
        })
    }

    // ─────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────

    pub fn graph(&self) -> &DataLayoutGraph {
        &self.graph
    }

    pub fn status(&self) -> WizardStatus {
        self.state.lock().status
    }

    /// Active step index, `None` once done
    pub fn position(&self) -> Option<usize> {
        match self.status() {
            WizardStatus::AtStep(i) => Some(i),
            WizardStatus::Done => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status() == WizardStatus::Done
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Edits staged on the active step
    pub fn staged(&self) -> Vec<Edit> {
        let state = self.state.lock();
        match state.status {
            WizardStatus::AtStep(i) => state.staged[i].clone(),
            WizardStatus::Done => Vec::new(),
        }
    }

    pub fn step_view(&self) -> Option<StepView> {
        let index = self.position()?;
        let step = &self.steps[index];
        Some(StepView {
            index,
            name: step.name.clone(),
            is_last: index + 1 == self.steps.len(),
            backing: step
                .backing
                .as_deref()
                .and_then(|node| self.graph.get(node).ok()),
        })
    }

    // ─────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────

    /// Queue an edit on the active step
    pub fn stage(&self, edit: Edit) -> Result<()> {
        if !self.graph.contains(edit.node()) {
            return Err(WizardError::UnknownNode {
                name: edit.node().to_string(),
            });
        }

        let mut state = self.state.lock();
        match state.status {
            WizardStatus::AtStep(i) => {
                state.staged[i].push(edit);
                Ok(())
            }
            WizardStatus::Done => Err(WizardError::WizardComplete),
        }
    }

    /// Commit staged edits, hydrate, and advance when nothing blocks
    #[instrument(skip(self), fields(step = tracing::field::Empty))]
    pub async fn on_submit(&self) -> Result<SubmitOutcome> {
        let (step, token, edits) = {
            let mut state = self.state.lock();
            let step = match state.status {
                WizardStatus::AtStep(i) => i,
                WizardStatus::Done => return Err(WizardError::WizardComplete),
            };
            if let Some(node) = self.busy_node(step) {
                debug!(step, node = %node, "submit ignored while loading");
                self.graph.event_log().emit(EventKind::SubmitIgnored {
                    step,
                    loading: Arc::clone(&node),
                });
                return Ok(SubmitOutcome::Busy { node });
            }
            let edits = std::mem::take(&mut state.staged[step]);
            (step, state.token, edits)
        };
        tracing::Span::current().record("step", step);

        let touched = self.commit(step, token, edits)?;
        let planned = self.plan(step, &touched)?;

        let hydrations = planned.into_iter().map(|p| {
            let pending = self.graph.hydrate(&p.node);
            async move { (p, pending.await) }
        });
        let results = join_all(hydrations).await;

        if self.state.lock().token != token {
            return Ok(SubmitOutcome::Superseded);
        }

        for (planned, result) in results {
            match result {
                Ok(_) => {}
                Err(WizardError::Hydration { source, .. }) if planned.blocking => {
                    info!(step, node = %planned.node, error = %source, "submit blocked");
                    self.graph.event_log().emit(EventKind::SubmitBlocked {
                        step,
                        node: Arc::clone(&planned.node),
                        error: source.to_string(),
                    });
                    return Ok(SubmitOutcome::Blocked {
                        node: planned.node,
                        error: source,
                    });
                }
                // stays on the node, surfaced by the step that shows it
                Err(WizardError::Hydration { .. }) => {}
                Err(WizardError::DependencyNotReady { .. }) if !planned.blocking => {}
                Err(e) => return Err(e),
            }
        }

        self.advance(step, token)
    }

    /// Move one step back; no hydration, entered data is kept
    pub fn on_back(&self) -> Result<WizardStatus> {
        let mut state = self.state.lock();
        match state.status {
            WizardStatus::Done => Err(WizardError::WizardComplete),
            WizardStatus::AtStep(0) => Ok(WizardStatus::AtStep(0)),
            WizardStatus::AtStep(i) => {
                state.status = WizardStatus::AtStep(i - 1);
                state.token += 1;
                self.graph
                    .event_log()
                    .emit(EventKind::StepBack { from: i, to: i - 1 });
                Ok(state.status)
            }
        }
    }

    /// Back to the first step with an empty graph
    pub fn reset(&self) {
        {
            let mut state = self.state.lock();
            state.status = WizardStatus::AtStep(0);
            state.staged.iter_mut().for_each(Vec::clear);
            state.token += 1;
        }
        self.graph.reset();
    }

    /// Look up the active step's resource, then submit
    ///
    /// A lookup failure is stored on `result_node` and reported as
    /// `Blocked`. On success the unique result and the reported query input
    /// are staged as assignments before submitting.
    pub async fn resolve_and_submit(
        &self,
        resolver: &dyn Resolver,
        query: &ResolverQuery,
        result_node: &str,
        input_node: &str,
    ) -> Result<SubmitOutcome> {
        let (step, token) = {
            let state = self.state.lock();
            match state.status {
                WizardStatus::AtStep(i) => (i, state.token),
                WizardStatus::Done => return Err(WizardError::WizardComplete),
            }
        };
        if !self.graph.contains(input_node) {
            return Err(WizardError::UnknownNode {
                name: input_node.to_string(),
            });
        }

        self.graph.set_loading(result_node, true)?;
        let lookup = resolve_unique(resolver, query).await;
        self.graph.set_loading(result_node, false)?;

        if self.state.lock().token != token {
            return Ok(SubmitOutcome::Superseded);
        }

        match lookup {
            Ok((resource, input)) => {
                self.stage(Edit::assign(result_node, resource))?;
                self.stage(Edit::assign(input_node, input))?;
                self.on_submit().await
            }
            Err(lookup) => {
                let error = NodeError::Lookup(lookup);
                self.graph.record_error(result_node, error.clone())?;
                let node: Arc<str> = Arc::from(result_node);
                self.graph.event_log().emit(EventKind::SubmitBlocked {
                    step,
                    node: Arc::clone(&node),
                    error: error.to_string(),
                });
                Ok(SubmitOutcome::Blocked { node, error })
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Submit internals
    // ─────────────────────────────────────────────────────────────

    /// Backing node of the active or next step that is still loading
    fn busy_node(&self, step: usize) -> Option<Arc<str>> {
        [Some(step), self.next_index(step)]
            .into_iter()
            .flatten()
            .filter_map(|i| self.steps[i].backing.clone())
            .find(|node| self.graph.is_loading(node).unwrap_or(false))
    }

    fn next_index(&self, step: usize) -> Option<usize> {
        (step + 1 < self.steps.len()).then_some(step + 1)
    }

    /// Apply edits in order; on failure the unapplied ones stay staged
    fn commit(&self, step: usize, token: u64, edits: Vec<Edit>) -> Result<Vec<Arc<str>>> {
        let mut touched: Vec<Arc<str>> = Vec::new();

        for (applied, edit) in edits.iter().enumerate() {
            let result = match edit {
                Edit::Assign { node, value } => self.graph.assign(node, value.clone()),
                Edit::Update { node, path, value } => {
                    self.graph.update_data(node, path, value.clone())
                }
            };

            if let Err(e) = result {
                let mut state = self.state.lock();
                if state.token == token {
                    let rest = edits[applied..].to_vec();
                    state.staged[step].splice(0..0, rest);
                }
                return Err(e);
            }

            if !touched.iter().any(|n| **n == *edit.node()) {
                touched.push(Arc::from(edit.node()));
            }
        }

        Ok(touched)
    }

    /// Derived dependents of the touched nodes, plus the next backing node
    fn plan(&self, step: usize, touched: &[Arc<str>]) -> Result<Vec<Planned>> {
        let target = self.next_index(step).unwrap_or(step);
        let blocking = self.steps[target]
            .backing
            .clone()
            .filter(|node| self.graph.has_hydrator(node).unwrap_or(false));

        let mut planned: Vec<Planned> = Vec::new();
        let mut blocking_touched = false;

        for node in touched {
            for dependent in self.graph.dependents(node)? {
                if blocking.as_deref() == Some(&*dependent) {
                    blocking_touched = true;
                    continue;
                }
                let deferred = self
                    .backing_index(&dependent)
                    .is_some_and(|i| i > step + 1);
                if deferred || planned.iter().any(|p| p.node == dependent) {
                    continue;
                }
                planned.push(Planned {
                    node: dependent,
                    blocking: false,
                });
            }
        }

        if let Some(node) = blocking {
            if blocking_touched || self.graph.needs_hydration(&node)? {
                planned.push(Planned {
                    node,
                    blocking: true,
                });
            }
        }

        debug!(
            step,
            hydrations = ?planned.iter().map(|p| p.node.as_ref()).collect::<Vec<_>>(),
            "submit plan"
        );
        Ok(planned)
    }

    fn backing_index(&self, node: &str) -> Option<usize> {
        self.steps
            .iter()
            .position(|s| s.backing.as_deref() == Some(node))
    }

    fn advance(&self, step: usize, token: u64) -> Result<SubmitOutcome> {
        let last = self.steps.len() - 1;
        let mut state = self.state.lock();
        if state.token != token || state.status != WizardStatus::AtStep(step) {
            return Ok(SubmitOutcome::Superseded);
        }
        state.token += 1;

        if step == last {
            state.status = WizardStatus::Done;
            drop(state);
            self.finish(last);
            return Ok(SubmitOutcome::Done);
        }

        let to = step + 1;
        state.status = WizardStatus::AtStep(to);
        drop(state);
        info!(from = step, to, step_name = %self.steps[to].name, "step advanced");
        self.graph
            .event_log()
            .emit(EventKind::StepAdvanced { from: step, to });
        Ok(SubmitOutcome::Advanced { from: step, to })
    }

    fn finish(&self, last: usize) {
        let output = self.steps[last]
            .backing
            .as_deref()
            .and_then(|node| self.graph.value(node).ok().flatten())
            .unwrap_or(Value::Null);
        info!(steps = self.steps.len(), "wizard done");
        self.graph
            .event_log()
            .emit(EventKind::WizardDone { step: last, output });
    }
}

impl std::fmt::Debug for WizardStepController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardStepController")
            .field("steps", &self.step_names())
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LookupError, TransportError};
    use crate::hydrator::{from_fn, Hydration};
    use crate::layout::LayoutBuilder;
    use crate::resolver::MockResolver;
    use crate::transport::{MockTransport, Target, UpdateRequest};
    use serde_json::json;

    fn update_hydrator() -> Arc<dyn crate::hydrator::Hydrator> {
        from_fn(|deps| {
            Ok(Hydration::Call(UpdateRequest::new(
                "k8s/update",
                Target::new("prod", "api"),
                deps[0].clone(),
            )))
        })
    }

    /// Lookup -> Modify (resource) -> Confirm (update)
    fn wizard(transport: Arc<MockTransport>) -> WizardStepController {
        let graph = LayoutBuilder::new()
            .root("input")
            .root("resource")
            .derived("update", ["resource", "input"], update_hydrator())
            .build(transport)
            .unwrap();
        WizardStepController::new(
            graph,
            vec![
                StepSpec::new("Lookup"),
                StepSpec::new("Modify").backed_by("resource"),
                StepSpec::new("Confirm").backed_by("update"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_and_unknown_backing() {
        let graph = LayoutBuilder::new()
            .root("a")
            .build(Arc::new(MockTransport::new()))
            .unwrap();
        assert!(matches!(
            WizardStepController::new(graph.clone(), vec![]),
            Err(WizardError::EmptyWizard)
        ));
        assert!(matches!(
            WizardStepController::new(graph, vec![StepSpec::new("x").backed_by("b")]),
            Err(WizardError::UnknownBackingNode { .. })
        ));
    }

    #[test]
    fn back_at_first_step_is_noop() {
        let wizard = wizard(Arc::new(MockTransport::new()));
        assert_eq!(wizard.on_back().unwrap(), WizardStatus::AtStep(0));
        assert_eq!(wizard.status(), WizardStatus::AtStep(0));
    }

    #[tokio::test]
    async fn lookup_defers_confirmation_hydration() {
        let transport = Arc::new(MockTransport::new());
        let wizard = wizard(transport.clone());

        wizard.stage(Edit::assign("input", json!({}))).unwrap();
        wizard.stage(Edit::assign("resource", json!({"cpu": "1"}))).unwrap();
        assert_eq!(
            wizard.on_submit().await.unwrap(),
            SubmitOutcome::Advanced { from: 0, to: 1 }
        );
        assert_eq!(transport.call_count(), 0);
        assert!(wizard.graph().is_stale("update").unwrap());
    }

    #[tokio::test]
    async fn full_run_completes_with_one_call() {
        let transport = Arc::new(MockTransport::new());
        let wizard = wizard(transport.clone());

        wizard.stage(Edit::assign("input", json!({}))).unwrap();
        wizard.stage(Edit::assign("resource", json!({"cpu": "1"}))).unwrap();
        wizard.on_submit().await.unwrap();

        wizard.stage(Edit::update("resource", "cpu", json!("2"))).unwrap();
        assert_eq!(
            wizard.on_submit().await.unwrap(),
            SubmitOutcome::Advanced { from: 1, to: 2 }
        );
        assert_eq!(transport.call_count(), 1);
        assert_eq!(transport.last_request().unwrap().fields, json!({"cpu": "2"}));

        let view = wizard.step_view().unwrap();
        assert!(view.is_last);
        let backing = view.backing.unwrap();
        assert!(backing.is_defined() && !backing.stale && backing.error.is_none());

        assert_eq!(wizard.on_submit().await.unwrap(), SubmitOutcome::Done);
        assert!(wizard.is_done());
        assert_eq!(transport.call_count(), 1);

        assert!(matches!(
            wizard.on_submit().await,
            Err(WizardError::WizardComplete)
        ));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn transport_error_blocks_and_retry_succeeds() {
        let transport = Arc::new(MockTransport::new());
        transport.fail(TransportError::Conflict("modified".into()));
        let wizard = wizard(transport.clone());

        wizard.stage(Edit::assign("input", json!({}))).unwrap();
        wizard.stage(Edit::assign("resource", json!({"cpu": "1"}))).unwrap();
        wizard.on_submit().await.unwrap();

        let outcome = wizard.on_submit().await.unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Blocked { ref node, error: NodeError::Transport(TransportError::Conflict(_)) }
                if &**node == "update"
        ));
        assert_eq!(wizard.status(), WizardStatus::AtStep(1));

        assert_eq!(
            wizard.on_submit().await.unwrap(),
            SubmitOutcome::Advanced { from: 1, to: 2 }
        );
        assert_eq!(wizard.on_submit().await.unwrap(), SubmitOutcome::Done);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn terminal_failure_keeps_last_step() {
        let transport = Arc::new(MockTransport::new());
        let wizard = wizard(transport.clone());

        wizard.stage(Edit::assign("input", json!({}))).unwrap();
        wizard.stage(Edit::assign("resource", json!({"cpu": "1"}))).unwrap();
        wizard.on_submit().await.unwrap();
        wizard.on_submit().await.unwrap();
        assert_eq!(wizard.status(), WizardStatus::AtStep(2));

        // edited on the last step: its backing node is stale again
        transport.fail(TransportError::Unavailable("apiserver down".into()));
        wizard.stage(Edit::update("resource", "cpu", json!("4"))).unwrap();
        assert!(matches!(
            wizard.on_submit().await.unwrap(),
            SubmitOutcome::Blocked { error: NodeError::Transport(TransportError::Unavailable(_)), .. }
        ));
        assert_eq!(wizard.status(), WizardStatus::AtStep(2));
        assert!(wizard.step_view().unwrap().backing.unwrap().error.is_some());

        assert_eq!(wizard.on_submit().await.unwrap(), SubmitOutcome::Done);
        assert_eq!(transport.call_count(), 3);
        assert_eq!(transport.last_request().unwrap().fields, json!({"cpu": "4"}));
    }

    #[tokio::test]
    async fn submit_while_loading_is_ignored() {
        let transport = Arc::new(MockTransport::gated());
        let wizard = Arc::new(wizard(transport.clone()));

        wizard.stage(Edit::assign("input", json!({}))).unwrap();
        wizard.stage(Edit::assign("resource", json!({"cpu": "1"}))).unwrap();
        wizard.on_submit().await.unwrap();

        let first = {
            let wizard = Arc::clone(&wizard);
            tokio::spawn(async move { wizard.on_submit().await })
        };
        while !wizard.graph().is_loading("update").unwrap() {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            wizard.on_submit().await.unwrap(),
            SubmitOutcome::Busy { .. }
        ));
        transport.release(1);
        assert_eq!(
            first.await.unwrap().unwrap(),
            SubmitOutcome::Advanced { from: 1, to: 2 }
        );
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn failed_edit_stays_staged() {
        let wizard = wizard(Arc::new(MockTransport::new()));
        wizard.stage(Edit::assign("resource", json!({"items": []}))).unwrap();
        wizard.stage(Edit::update("resource", "items[3]", json!(1))).unwrap();

        assert!(wizard.on_submit().await.is_err());
        assert_eq!(wizard.staged().len(), 1);
        assert_eq!(wizard.status(), WizardStatus::AtStep(0));
    }

    #[tokio::test]
    async fn resolve_and_submit_stores_lookup_errors() {
        let wizard = wizard(Arc::new(MockTransport::new()));
        let resolver = MockResolver::new();
        resolver.respond(vec![json!({"a": 1}), json!({"b": 2})], json!({}));

        let query = ResolverQuery::new("clutch.k8s.v1.Deployment", json!({"q": "api"}));
        let outcome = wizard
            .resolve_and_submit(&resolver, &query, "resource", "input")
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Blocked { error: NodeError::Lookup(LookupError::Ambiguous { count: 2, .. }), .. }
        ));
        assert_eq!(wizard.status(), WizardStatus::AtStep(0));
        let resource = wizard.graph().get("resource").unwrap();
        assert!(!resource.is_loading);
        assert!(resource.error.is_some());

        resolver.respond(vec![json!({"cpu": "1"})], json!({"q": "api"}));
        let outcome = wizard
            .resolve_and_submit(&resolver, &query, "resource", "input")
            .await
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Advanced { from: 0, to: 1 });
        assert_eq!(
            wizard.graph().value("input").unwrap(),
            Some(json!({"q": "api"}))
        );
    }

    #[tokio::test]
    async fn reset_returns_to_first_step() {
        let wizard = wizard(Arc::new(MockTransport::new()));
        wizard.stage(Edit::assign("resource", json!({"cpu": "1"}))).unwrap();
        wizard.on_submit().await.unwrap();
        wizard.stage(Edit::update("resource", "cpu", json!("3"))).unwrap();

        wizard.reset();
        assert_eq!(wizard.status(), WizardStatus::AtStep(0));
        assert!(wizard.staged().is_empty());
        assert_eq!(wizard.graph().value("resource").unwrap(), None);
    }
}

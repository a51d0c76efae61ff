//! Event log for wizard sessions
//!
//! Append-only audit trail of what happened to nodes and steps.
//! - Event: envelope with id + timestamp + kind
//! - EventKind: node-level and step-level variants
//! - EventLog: thread-safe, shared by the graph and its controller

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Single event in a wizard session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic sequence ID (for ordering)
    pub id: u64,
    /// Time since the session started (ms)
    pub timestamp_ms: u64,
    /// Event type and data
    pub kind: EventKind,
}

/// All event types (node level and step level)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    // ═══════════════════════════════════════════
    // NODE LEVEL
    // ═══════════════════════════════════════════
    NodeAssigned {
        node: Arc<str>,
    },
    NodeUpdated {
        node: Arc<str>,
        path: String,
        /// Derived nodes that became stale
        stale: Vec<Arc<str>>,
    },
    HydrationStarted {
        node: Arc<str>,
        dependencies: Vec<Arc<str>>,
    },
    /// A second hydrate joined the pending attempt
    HydrationCoalesced {
        node: Arc<str>,
    },
    TransportCalled {
        node: Arc<str>,
        kind: String,
        target: String,
    },
    HydrationCompleted {
        node: Arc<str>,
        duration_ms: u64,
    },
    HydrationFailed {
        node: Arc<str>,
        error: String,
        duration_ms: u64,
    },
    /// Result arrived after a reset and was dropped
    HydrationDiscarded {
        node: Arc<str>,
    },
    LookupFailed {
        node: Arc<str>,
        error: String,
    },
    LayoutReset,

    // ═══════════════════════════════════════════
    // STEP LEVEL
    // ═══════════════════════════════════════════
    StepAdvanced {
        from: usize,
        to: usize,
    },
    StepBack {
        from: usize,
        to: usize,
    },
    SubmitIgnored {
        step: usize,
        loading: Arc<str>,
    },
    SubmitBlocked {
        step: usize,
        node: Arc<str>,
        error: String,
    },
    WizardDone {
        step: usize,
        output: Value,
    },
}

impl EventKind {
    /// Extract the node name if the event is node-related
    pub fn node(&self) -> Option<&str> {
        match self {
            Self::NodeAssigned { node }
            | Self::NodeUpdated { node, .. }
            | Self::HydrationStarted { node, .. }
            | Self::HydrationCoalesced { node }
            | Self::TransportCalled { node, .. }
            | Self::HydrationCompleted { node, .. }
            | Self::HydrationFailed { node, .. }
            | Self::HydrationDiscarded { node }
            | Self::LookupFailed { node, .. }
            | Self::SubmitBlocked { node, .. } => Some(node),
            Self::SubmitIgnored { loading, .. } => Some(loading),
            Self::LayoutReset
            | Self::StepAdvanced { .. }
            | Self::StepBack { .. }
            | Self::WizardDone { .. } => None,
        }
    }

    /// Check if this is a step-level event
    pub fn is_step_event(&self) -> bool {
        matches!(
            self,
            Self::StepAdvanced { .. }
                | Self::StepBack { .. }
                | Self::SubmitIgnored { .. }
                | Self::SubmitBlocked { .. }
                | Self::WizardDone { .. }
        )
    }
}

/// Thread-safe, append-only event log
#[derive(Clone)]
pub struct EventLog {
    events: Arc<RwLock<Vec<Event>>>,
    start_time: Instant,
    next_id: Arc<AtomicU64>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            start_time: Instant::now(),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Emit an event (thread-safe, returns event ID)
    pub fn emit(&self, kind: EventKind) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let event = Event {
            id,
            timestamp_ms: self.start_time.elapsed().as_millis() as u64,
            kind,
        };

        self.events.write().push(event);
        id
    }

    /// Get all events (cloned)
    pub fn events(&self) -> Vec<Event> {
        self.events.read().clone()
    }

    /// Filter events by node name
    pub fn filter_node(&self, node: &str) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| e.kind.node() == Some(node))
            .collect()
    }

    /// Step-level events only
    pub fn step_events(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| e.kind.is_step_event())
            .collect()
    }

    /// Count events matching a predicate
    pub fn count(&self, predicate: impl Fn(&EventKind) -> bool) -> usize {
        self.events.read().iter().filter(|e| predicate(&e.kind)).count()
    }

    /// Serialize to JSON for persistence/debugging
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self.events()).unwrap_or(Value::Null)
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn eventkind_node_extraction() {
        let started = EventKind::HydrationStarted {
            node: "updateData".into(),
            dependencies: vec!["resourceData".into()],
        };
        assert_eq!(started.node(), Some("updateData"));
        assert_eq!(EventKind::StepBack { from: 1, to: 0 }.node(), None);
    }

    #[test]
    fn eventkind_is_step_event() {
        assert!(EventKind::StepAdvanced { from: 0, to: 1 }.is_step_event());
        assert!(EventKind::WizardDone {
            step: 2,
            output: json!({}),
        }
        .is_step_event());
        assert!(!EventKind::LayoutReset.is_step_event());
    }

    #[test]
    fn eventkind_serializes_with_type_tag() {
        let kind = EventKind::TransportCalled {
            node: "updateData".into(),
            kind: "k8s/updateDeployment".into(),
            target: "api".into(),
        };

        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "transport_called");
        assert_eq!(json["node"], "updateData");
        assert_eq!(json["kind"], "k8s/updateDeployment");
    }

    #[test]
    fn eventkind_deserializes_from_tagged_json() {
        let json = json!({"type": "step_back", "from": 2, "to": 1});
        let kind: EventKind = serde_json::from_value(json).unwrap();
        assert_eq!(kind, EventKind::StepBack { from: 2, to: 1 });
    }

    #[test]
    fn eventlog_emit_returns_monotonic_ids() {
        let log = EventLog::new();
        assert!(log.is_empty());

        let id1 = log.emit(EventKind::LayoutReset);
        let id2 = log.emit(EventKind::NodeAssigned {
            node: "resourceData".into(),
        });

        assert_eq!((id1, id2), (0, 1));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn eventlog_filters_and_counts() {
        let log = EventLog::new();
        log.emit(EventKind::NodeAssigned { node: "a".into() });
        log.emit(EventKind::NodeAssigned { node: "b".into() });
        log.emit(EventKind::StepAdvanced { from: 0, to: 1 });

        assert_eq!(log.filter_node("a").len(), 1);
        assert_eq!(log.step_events().len(), 1);
        assert_eq!(
            log.count(|k| matches!(k, EventKind::NodeAssigned { .. })),
            2
        );
        assert_eq!(log.to_json().as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn eventlog_clones_share_storage() {
        let log = EventLog::new();
        let clone = log.clone();
        clone.emit(EventKind::LayoutReset);
        assert_eq!(log.len(), 1);
    }
}

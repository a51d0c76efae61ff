//! Mock transport for testing
//!
//! Returns queued outcomes without making real calls and records every
//! request. A gated mock holds each call until the test releases it, which
//! is how pending hydrations are observed.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::Semaphore;

use super::{Transport, UpdateRequest};
use crate::error::TransportError;

/// Mock transport that returns predefined outcomes
#[derive(Clone)]
pub struct MockTransport {
    /// Outcomes to return (FIFO)
    outcomes: Arc<Mutex<VecDeque<Result<Value, TransportError>>>>,
    /// Track all requests made (for assertions)
    requests: Arc<Mutex<Vec<UpdateRequest>>>,
    /// When set, each call waits for one permit
    gate: Option<Arc<Semaphore>>,
}

impl MockTransport {
    /// Echo transport: answers each call with its request body
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            gate: None,
        }
    }

    /// Calls stay pending until [`MockTransport::release`]
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::new()
        }
    }

    /// Queue a successful response
    pub fn respond(&self, value: Value) -> &Self {
        self.outcomes.lock().push_back(Ok(value));
        self
    }

    /// Queue a failure
    pub fn fail(&self, error: TransportError) -> &Self {
        self.outcomes.lock().push_back(Err(error));
        self
    }

    /// Let `calls` pending (or future) calls complete
    pub fn release(&self, calls: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(calls);
        }
    }

    /// Get all requests made to this transport
    pub fn requests(&self) -> Vec<UpdateRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<UpdateRequest> {
        self.requests.lock().last().cloned()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn update(&self, request: &UpdateRequest) -> Result<Value, TransportError> {
        self.requests.lock().push(request.clone());

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| TransportError::Unavailable("mock gate closed".into()))?;
            permit.forget();
        }

        let queued = self.outcomes.lock().pop_front();
        queued.unwrap_or_else(|| Ok(request.body()))
    }
}

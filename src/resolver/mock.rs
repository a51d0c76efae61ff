//! Mock resolver with queued resolutions

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::{Resolution, Resolver, ResolverQuery};
use crate::error::LookupError;

/// Resolver that answers from a FIFO queue, honouring `max_results`
#[derive(Clone, Default)]
pub struct MockResolver {
    outcomes: Arc<Mutex<VecDeque<Result<Resolution, LookupError>>>>,
    queries: Arc<Mutex<Vec<ResolverQuery>>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a resolution with these results and reported input
    pub fn respond(&self, results: Vec<Value>, input: Value) -> &Self {
        self.outcomes
            .lock()
            .push_back(Ok(Resolution { results, input }));
        self
    }

    pub fn fail(&self, error: LookupError) -> &Self {
        self.outcomes.lock().push_back(Err(error));
        self
    }

    pub fn queries(&self) -> Vec<ResolverQuery> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl Resolver for MockResolver {
    fn name(&self) -> &str {
        "mock"
    }

    async fn resolve(&self, query: &ResolverQuery) -> Result<Resolution, LookupError> {
        self.queries.lock().push(query.clone());

        let queued = self.outcomes.lock().pop_front();
        match queued {
            Some(Ok(mut resolution)) => {
                resolution.results.truncate(query.max_results);
                Ok(resolution)
            }
            Some(Err(e)) => Err(e),
            None => Err(LookupError::NotFound {
                resource_type: query.resource_type.clone(),
            }),
        }
    }
}

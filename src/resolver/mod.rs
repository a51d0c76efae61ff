//! # Resolver Abstraction Layer
//!
//! A resolver turns a search query into ranked candidate resources. Wizards
//! use it to populate their root nodes.
//!
//! Callers that need exactly one resource go through [`resolve_unique`]:
//! zero matches is [`LookupError::NotFound`], more than one is
//! [`LookupError::Ambiguous`]. Extra matches are never silently dropped.

mod mock;

pub use mock::MockResolver;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::LookupError;

/// Search request for a resource type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverQuery {
    /// Resource type token, e.g. "clutch.k8s.v1.Deployment"
    pub resource_type: String,
    pub max_results: usize,
    /// Free-form query fields as entered by the operator
    #[serde(default)]
    pub input: Value,
}

impl ResolverQuery {
    pub fn new(resource_type: impl Into<String>, input: Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            max_results: 1,
            input,
        }
    }

    pub fn with_limit(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// Ranked results plus the input that produced them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub results: Vec<Value>,
    pub input: Value,
}

/// Lookup capability consumed by wizards
#[async_trait]
pub trait Resolver: Send + Sync {
    fn name(&self) -> &str;

    async fn resolve(&self, query: &ResolverQuery) -> Result<Resolution, LookupError>;
}

/// Resolve a query that must identify exactly one resource
///
/// Asks for at least two results so a second match is visible. Returns the
/// resource and the query input the resolver reported.
pub async fn resolve_unique(
    resolver: &dyn Resolver,
    query: &ResolverQuery,
) -> Result<(Value, Value), LookupError> {
    let probe = query.clone().with_limit(query.max_results.max(2));
    let Resolution { mut results, input } = resolver.resolve(&probe).await?;
    debug!(
        resolver = resolver.name(),
        resource_type = %query.resource_type,
        matches = results.len(),
        "resolver returned"
    );

    match results.len() {
        0 => Err(LookupError::NotFound {
            resource_type: query.resource_type.clone(),
        }),
        1 => Ok((results.remove(0), input)),
        count => Err(LookupError::Ambiguous {
            resource_type: query.resource_type.clone(),
            count,
        }),
    }
}

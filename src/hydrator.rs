//! Hydrators: derive a node's value from its dependency values
//!
//! A hydrator is synchronous. Anything asynchronous is expressed as a
//! [`Hydration::Call`] that the graph sends to its transport.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::NodeError;
use crate::transport::UpdateRequest;

/// Result of running a hydrator
#[derive(Debug, Clone, PartialEq)]
pub enum Hydration {
    /// Value is available now
    Ready(Value),
    /// Value is the response of this transport call
    Call(UpdateRequest),
}

/// Derives a value from dependency values, in declaration order
pub trait Hydrator: Send + Sync {
    fn hydrate(&self, dependencies: &[Value]) -> Result<Hydration, NodeError>;
}

impl<F> Hydrator for F
where
    F: Fn(&[Value]) -> Result<Hydration, NodeError> + Send + Sync,
{
    fn hydrate(&self, dependencies: &[Value]) -> Result<Hydration, NodeError> {
        self(dependencies)
    }
}

/// Box a closure as a shareable hydrator
pub fn from_fn<F>(f: F) -> Arc<dyn Hydrator>
where
    F: Fn(&[Value]) -> Result<Hydration, NodeError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Deserialize dependency `index` into a typed view
pub fn dependency<T: DeserializeOwned>(
    dependencies: &[Value],
    index: usize,
    what: &str,
) -> Result<T, NodeError> {
    let value = dependencies
        .get(index)
        .ok_or_else(|| NodeError::Hydrator(format!("missing dependency #{index} ({what})")))?;
    serde_json::from_value(value.clone())
        .map_err(|e| NodeError::Hydrator(format!("{what} has an unexpected shape: {e}")))
}

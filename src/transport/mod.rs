//! # Transport Abstraction Layer
//!
//! Trait and implementations for the mutating update call a hydrator may
//! describe.
//!
//! - [`Transport`] - Core trait for performing an update request
//! - [`HttpTransport`] - JSON POST to `{base_url}/v1/{kind}`
//! - [`MockTransport`] - Test transport with queued outcomes and a gate
//!
//! The engine never retries a transport call; a retry is a user-initiated
//! submit.
//!
//! ```rust
//! use wizflow::transport::create_transport;
//! use wizflow::WizflowConfig;
//!
//! let config = WizflowConfig::default();
//! assert!(create_transport("mock", &config).is_ok());
//! assert!(create_transport("carrier-pigeon", &config).is_err());
//! ```

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::WizflowConfig;
use crate::error::{TransportError, WizardError};

// ============================================================================
// TRANSPORT TRAIT (ASYNC)
// ============================================================================

/// Performs the remote update described by a hydrator
#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the transport name (e.g., "http", "mock")
    fn name(&self) -> &str;

    /// Perform the update, returning the (possibly normalized) updated resource
    async fn update(&self, request: &UpdateRequest) -> Result<Value, TransportError>;
}

// ============================================================================
// REQUEST TYPES
// ============================================================================

/// Identity of the resource being updated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clientset: Option<String>,
    pub cluster: String,
    /// Absent for cluster-scoped resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub name: String,
}

impl Target {
    pub fn new(cluster: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            clientset: None,
            cluster: cluster.into(),
            namespace: None,
            name: name.into(),
        }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_clientset(mut self, clientset: Option<String>) -> Self {
        self.clientset = clientset;
        self
    }
}

/// Update call: request kind, target identity and sparse field mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest {
    /// Route of the call, e.g. "k8s/updateDeployment"
    pub kind: String,
    pub target: Target,
    pub fields: Value,
}

impl UpdateRequest {
    pub fn new(kind: impl Into<String>, target: Target, fields: Value) -> Self {
        Self {
            kind: kind.into(),
            target,
            fields,
        }
    }

    /// Request body: target identity flattened next to `fields`
    pub fn body(&self) -> Value {
        let mut body = serde_json::to_value(&self.target).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut body {
            map.insert("fields".to_string(), self.fields.clone());
        }
        body
    }
}

// ============================================================================
// TRANSPORT FACTORY
// ============================================================================

/// Create a transport instance by name
///
/// | Name | Description | Requires |
/// |------|-------------|----------|
/// | `http` | JSON over HTTP | `transport.base_url` or `WIZFLOW_BASE_URL` |
/// | `mock` | Testing / dry runs | Nothing |
pub fn create_transport(
    name: &str,
    config: &WizflowConfig,
) -> Result<Arc<dyn Transport>, WizardError> {
    match name.to_lowercase().as_str() {
        "http" => Ok(Arc::new(HttpTransport::from_config(config)?)),
        "mock" => Ok(Arc::new(MockTransport::new())),
        _ => Err(WizardError::ConfigError {
            reason: format!("Unknown transport: '{}'. Available: http, mock", name),
        }),
    }
}

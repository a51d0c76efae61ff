//! HTTP transport: JSON POST against the update API
//!
//! One shared `reqwest::Client` (connection pooling). The configured request
//! timeout is the only deadline applied to an update call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{Transport, UpdateRequest};
use crate::config::WizflowConfig;
use crate::error::{TransportError, WizardError};

/// Transport posting update requests to `{base_url}/v1/{kind}`
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, WizardError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("wizflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WizardError::ConfigError {
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &WizflowConfig) -> Result<Self, WizardError> {
        let base_url = config.base_url()?.ok_or_else(|| WizardError::ConfigError {
            reason: "transport.base_url is not set".to_string(),
        })?;
        Self::new(base_url, config.transport.timeout())
    }

    /// Endpoint for a request kind, e.g. "k8s/updateDeployment"
    pub fn endpoint(&self, kind: &str) -> Result<Url, TransportError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let kind = kind.trim_start_matches('/');
        Url::parse(&format!("{base}/v1/{kind}"))
            .map_err(|e| TransportError::Validation(format!("invalid request kind '{kind}': {e}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, request), fields(kind = %request.kind, target = %request.target.name))]
    async fn update(&self, request: &UpdateRequest) -> Result<Value, TransportError> {
        let url = self.endpoint(&request.kind)?;
        debug!(%url, "posting update request");

        let response = self
            .client
            .post(url)
            .json(&request.body())
            .send()
            .await
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            warn!(%status, "update request rejected");
            return Err(classify(status, error_message(&text, status)));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| TransportError::Unavailable(format!("invalid JSON response: {e}")))
    }
}

/// Map an HTTP status onto the transport error taxonomy
fn classify(status: StatusCode, message: String) -> TransportError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            TransportError::Validation(message)
        }
        StatusCode::NOT_FOUND => TransportError::NotFound(message),
        StatusCode::CONFLICT => TransportError::Conflict(message),
        _ => TransportError::Unavailable(message),
    }
}

/// Prefer the API's `message` field, fall back to the raw body
fn error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| status.to_string())
}

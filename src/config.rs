//! Wizflow Configuration Module
//!
//! Transport endpoint, resolver limits and defaults.
//! Config is stored in `~/.config/wizflow/config.toml`.
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Environment variables (`WIZFLOW_BASE_URL`, `WIZFLOW_CLIENTSET`)
//! 2. Config file (`~/.config/wizflow/config.toml`)
//! 3. Defaults

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, WizardError};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WizflowConfig {
    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub defaults: Defaults,
}

/// `[transport]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransportConfig {
    /// Update API root, e.g. "https://clutch.example.com/api"
    pub base_url: Option<String>,

    /// Request timeout applied by the HTTP transport
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TransportConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// `[resolver]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolverConfig {
    /// Results requested per search
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            search_limit: default_search_limit(),
        }
    }
}

fn default_search_limit() -> usize {
    1
}

/// `[defaults]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Defaults {
    /// Clientset used when a resolver input does not name one
    pub clientset: Option<String>,
}

impl WizflowConfig {
    /// Returns `~/.config/wizflow/` on Unix, `%APPDATA%/wizflow/` on Windows
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wizflow")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load the user config file, or defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| WizardError::ConfigError {
            reason: format!("Failed to read config file: {}", e),
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| WizardError::ConfigError {
            reason: format!("Failed to parse config file: {}", e),
        })
    }

    /// Merge with environment variables
    ///
    /// Environment variables take precedence over config file values.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `WIZFLOW_*` overrides from an arbitrary source
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("WIZFLOW_BASE_URL").filter(|v| !v.is_empty()) {
            self.transport.base_url = Some(url);
        }
        if let Some(clientset) = lookup("WIZFLOW_CLIENTSET").filter(|v| !v.is_empty()) {
            self.defaults.clientset = Some(clientset);
        }
        self
    }

    /// Parsed transport base URL, if configured
    pub fn base_url(&self) -> Result<Option<Url>> {
        self.transport
            .base_url
            .as_deref()
            .map(|raw| {
                let url = Url::parse(raw).map_err(|e| WizardError::ConfigError {
                    reason: format!("Invalid transport.base_url '{}': {}", raw, e),
                })?;
                match url.scheme() {
                    "http" | "https" => Ok(url),
                    scheme => Err(WizardError::ConfigError {
                        reason: format!("Unsupported base_url scheme '{}'", scheme),
                    }),
                }
            })
            .transpose()
    }
}

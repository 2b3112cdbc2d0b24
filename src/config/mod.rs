//! Configuration management
//!
//! Loads the throttle, statsbeat and sender settings from YAML or from the
//! environment. Values are not validated beyond parsing: out-of-range
//! sampling percentages are clamped where they are used.

pub mod models;

pub use models::*;

use crate::utils::error::{Result, TelemetryError};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::{debug, info};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Customer instrumentation key, reported as `cikey`
    #[serde(default)]
    pub instrumentation_key: String,
    /// Customer ingestion endpoint
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    /// One entry per throttled message category
    #[serde(default)]
    pub throttle: Vec<ThrottleMgrConfig>,
    /// Self-monitoring settings
    #[serde(default)]
    pub statsbeat: StatsbeatConfig,
    /// Transport settings
    #[serde(default)]
    pub sender: SenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instrumentation_key: String::new(),
            endpoint_url: default_endpoint_url(),
            throttle: Vec::new(),
            statsbeat: StatsbeatConfig::default(),
            sender: SenderConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TelemetryError::config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml_str(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| TelemetryError::config(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override fields from `AI_*` environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(ikey) = env::var("AI_INSTRUMENTATION_KEY") {
            self.instrumentation_key = ikey;
        }
        if let Ok(endpoint) = env::var("AI_ENDPOINT_URL") {
            self.endpoint_url = endpoint.clone();
            self.sender.endpoint_url = endpoint;
        }
        if let Ok(disabled) = env::var("AI_DISABLE_STATSBEAT") {
            self.statsbeat.disable_statsbeat = parse_bool(&disabled).ok_or_else(|| {
                TelemetryError::config(format!("Invalid AI_DISABLE_STATSBEAT: {}", disabled))
            })?;
        }
        if let Ok(retries) = env::var("AI_SENDER_MAX_RETRIES") {
            self.sender.max_retries = retries.parse().map_err(|e| {
                TelemetryError::config(format!("Invalid AI_SENDER_MAX_RETRIES: {}", e))
            })?;
        }

        debug!("Configuration overrides applied from environment");
        Ok(())
    }

    /// Effective throttle configuration for a category
    ///
    /// Categories without an explicit entry get the defaults.
    pub fn throttle_config(&self, key: ThrottleMsgKey) -> ThrottleMgrConfig {
        self.throttle
            .iter()
            .find(|c| c.msg_key == key)
            .cloned()
            .unwrap_or_else(|| ThrottleMgrConfig::for_key(key))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

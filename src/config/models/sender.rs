//! Transport configuration

use super::*;
use serde::{Deserialize, Serialize};

/// HTTP sender configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderConfig {
    /// Ingestion endpoint the batches are posted to
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    /// Envelopes per request
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay between attempts, multiplied by the attempt number
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            max_batch_size: default_max_batch_size(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_secs: default_timeout(),
        }
    }
}

impl SenderConfig {
    /// Configuration posting to `endpoint_url` with default retry policy
    pub fn for_endpoint<S: Into<String>>(endpoint_url: S) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            ..Default::default()
        }
    }
}

//! Statsbeat (self-monitoring) configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Self-monitoring configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsbeatConfig {
    /// Turn the whole component into a no-op
    #[serde(default)]
    pub disable_statsbeat: bool,
    /// Override of the SDK-reserved statsbeat endpoint
    #[serde(default)]
    pub statsbeat_endpoint: Option<String>,
    /// Cadence of the optional background flush task
    #[serde(default = "default_short_interval_secs")]
    pub short_interval_secs: u64,
}

impl Default for StatsbeatConfig {
    fn default() -> Self {
        Self {
            disable_statsbeat: false,
            statsbeat_endpoint: None,
            short_interval_secs: default_short_interval_secs(),
        }
    }
}

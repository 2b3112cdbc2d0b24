//! Diagnostic throttle configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a throttled diagnostic message
///
/// Serialized as its numeric code, which is also the suffix of the storage
/// key so values written by earlier releases stay readable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ThrottleMsgKey {
    #[default]
    Default,
    IkeyDeprecate,
    SdkLdrUpdate,
    CdnDeprecation,
}

impl ThrottleMsgKey {
    pub fn code(&self) -> u8 {
        match self {
            Self::Default => 0,
            Self::IkeyDeprecate => 1,
            Self::SdkLdrUpdate => 2,
            Self::CdnDeprecation => 3,
        }
    }
}

impl From<ThrottleMsgKey> for u8 {
    fn from(key: ThrottleMsgKey) -> Self {
        key.code()
    }
}

impl TryFrom<u8> for ThrottleMsgKey {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Default),
            1 => Ok(Self::IkeyDeprecate),
            2 => Ok(Self::SdkLdrUpdate),
            3 => Ok(Self::CdnDeprecation),
            other => Err(format!("unknown throttle message key: {}", other)),
        }
    }
}

impl fmt::Display for ThrottleMsgKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Per-category throttle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleMgrConfig {
    /// Category this configuration applies to
    #[serde(default)]
    pub msg_key: ThrottleMsgKey,
    /// Hard off-switch
    #[serde(default)]
    pub disabled: bool,
    /// Sampling and quota
    #[serde(default)]
    pub limit: ThrottleLimit,
    /// Window cadence
    #[serde(default)]
    pub interval: ThrottleInterval,
}

impl ThrottleMgrConfig {
    /// Default configuration for a category
    pub fn for_key(msg_key: ThrottleMsgKey) -> Self {
        Self {
            msg_key,
            ..Default::default()
        }
    }
}

/// Sampling and per-window quota
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleLimit {
    /// Probability (0-100) that an opened window arms
    #[serde(default = "default_sampling_percentage")]
    pub sampling_percentage: f64,
    /// Emissions allowed while a window stays armed
    #[serde(default = "default_max_send_number")]
    pub max_send_number: u32,
}

impl Default for ThrottleLimit {
    fn default() -> Self {
        Self {
            sampling_percentage: default_sampling_percentage(),
            max_send_number: default_max_send_number(),
        }
    }
}

impl ThrottleLimit {
    /// Sampling percentage clamped into `0..=100`
    pub fn effective_sampling_percentage(&self) -> f64 {
        if self.sampling_percentage.is_nan() {
            return 0.0;
        }
        self.sampling_percentage.clamp(0.0, 100.0)
    }
}

/// Calendar cadence of throttle windows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleInterval {
    /// Minimum whole months between windows
    #[serde(default = "default_month_interval")]
    pub month_interval: u32,
    /// Minimum whole days between windows
    #[serde(default = "default_day_interval")]
    pub day_interval: u32,
    /// Ceiling on arming slots within a calendar month
    #[serde(default = "default_max_times_per_month")]
    pub max_times_per_month: u32,
}

impl Default for ThrottleInterval {
    fn default() -> Self {
        Self {
            month_interval: default_month_interval(),
            day_interval: default_day_interval(),
            max_times_per_month: default_max_times_per_month(),
        }
    }
}

//! Throttle gate types

use crate::config::ThrottleMsgKey;
use crate::utils::logging::{InternalMessageId, LoggingSeverity};
use serde::{Deserialize, Serialize};

/// Outcome of a `send` that was evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleResult {
    /// The message was emitted
    pub is_throttled: bool,
    /// Emissions recorded in the current window, 0 when not emitted
    pub throttle_num: u32,
}

impl ThrottleResult {
    pub(super) fn emitted(throttle_num: u32) -> Self {
        Self {
            is_throttled: true,
            throttle_num,
        }
    }

    pub(super) fn suppressed() -> Self {
        Self {
            is_throttled: false,
            throttle_num: 0,
        }
    }
}

/// A `send` deferred until the manager becomes ready
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMessage {
    pub key: ThrottleMsgKey,
    pub message_id: InternalMessageId,
    pub message: String,
    pub severity: LoggingSeverity,
}

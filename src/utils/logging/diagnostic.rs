//! Diagnostic logger seam
//!
//! The throttle gate never writes to a log directly; it hands each permitted
//! message to a [`DiagnosticLogger`].

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info, warn};

/// Severity of an internal diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoggingSeverity {
    /// Unrecoverable SDK problem
    Critical,
    /// Something the customer should act on
    #[default]
    Warning,
    /// Informational notice
    Info,
}

/// Identifier attached to every internal diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InternalMessageId {
    InstrumentationKeyDeprecation,
    SdkLdrUpdate,
    CdnDeprecation,
}

impl InternalMessageId {
    /// Stable name used as a structured log field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InstrumentationKeyDeprecation => "InstrumentationKeyDeprecation",
            Self::SdkLdrUpdate => "SdkLdrUpdate",
            Self::CdnDeprecation => "CdnDeprecation",
        }
    }
}

impl fmt::Display for InternalMessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sink for internal diagnostic messages
pub trait DiagnosticLogger: Send + Sync {
    /// Emit a single diagnostic message
    fn throw_internal(&self, severity: LoggingSeverity, message_id: InternalMessageId, message: &str);
}

/// Forwards diagnostics to the `tracing` subscriber
#[derive(Debug, Default, Clone)]
pub struct TracingDiagnosticLogger;

impl DiagnosticLogger for TracingDiagnosticLogger {
    fn throw_internal(&self, severity: LoggingSeverity, message_id: InternalMessageId, message: &str) {
        let id = message_id.as_str();
        match severity {
            LoggingSeverity::Critical => error!(message_id = id, "{}", message),
            LoggingSeverity::Warning => warn!(message_id = id, "{}", message),
            LoggingSeverity::Info => info!(message_id = id, "{}", message),
        }
    }
}

/// A message captured by [`RecordingLogger`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMessage {
    pub severity: LoggingSeverity,
    pub message_id: InternalMessageId,
    pub message: String,
}

/// Keeps every emitted diagnostic in memory
///
/// Useful for hosts that surface diagnostics in their own UI, and for tests.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    messages: Mutex<Vec<RecordedMessage>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages emitted so far
    pub fn call_count(&self) -> usize {
        self.messages.lock().len()
    }

    /// Snapshot of the emitted messages in order
    pub fn messages(&self) -> Vec<RecordedMessage> {
        self.messages.lock().clone()
    }
}

impl DiagnosticLogger for RecordingLogger {
    fn throw_internal(&self, severity: LoggingSeverity, message_id: InternalMessageId, message: &str) {
        self.messages.lock().push(RecordedMessage {
            severity,
            message_id,
            message: message.to_string(),
        });
    }
}

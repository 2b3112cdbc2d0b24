//! Logging utilities
//!
//! Subscriber setup for the `tracing` stack plus the diagnostic-logger seam
//! through which throttled internal messages reach the customer's log.

pub mod diagnostic;
pub mod init;

pub use diagnostic::{
    DiagnosticLogger, InternalMessageId, LoggingSeverity, RecordingLogger, RecordedMessage,
    TracingDiagnosticLogger,
};
pub use init::{LogFormat, init_tracing};

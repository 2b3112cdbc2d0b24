//! Utility modules
//!
//! - **error**: crate error type and result alias
//! - **logging**: subscriber setup and the diagnostic-logger seam
//! - **time**: calendar clock used by the throttle windows

pub mod error;
pub mod logging;
pub mod time;

pub use error::{Result, TelemetryError};
pub use logging::{DiagnosticLogger, InternalMessageId, LoggingSeverity};
pub use time::{Clock, FixedClock, SystemClock};

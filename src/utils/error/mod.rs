//! Error handling for the telemetry self-monitoring crate
//!
//! Only constructors and configuration loading surface these errors. The
//! throttle gate and the statsbeat counters resolve every failure internally.

mod helpers;
mod types;

pub use types::{Result, TelemetryError};

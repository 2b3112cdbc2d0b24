//! Core functionality
//!
//! The throttle gate for internal diagnostic messages, the statsbeat
//! self-monitoring counters, and the transport both of them ride on.

pub mod sender;
pub mod statsbeat;
pub mod throttle;

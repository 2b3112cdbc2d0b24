//! Self-monitoring counters (statsbeat)
//!
//! Network outcomes are accumulated per destination host and flushed as
//! metric items through a transport of their own, addressed to an
//! SDK-reserved instrumentation key. That transport is never given a
//! statsbeat handle, so statsbeat traffic is not counted.

mod background;
mod collector;
mod types;

pub use background::{MIN_FLUSH_INTERVAL, spawn_flush_task};
pub use collector::{Statsbeat, statsbeat_instrumentation_key};
pub use types::{
    CounterBucket, STATSBEAT_EU_IKEY, STATSBEAT_IKEY, STATSBEAT_LANGUAGE, metrics, properties,
};

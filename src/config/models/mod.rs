//! Configuration data models
//!
//! Field names follow the camelCase shape the host SDK already uses for its
//! JSON/YAML configuration.

#![allow(missing_docs)]

pub mod sender;
pub mod statsbeat;
pub mod throttle;

pub use sender::*;
pub use statsbeat::*;
pub use throttle::*;

/// Default ingestion endpoint
pub const DEFAULT_ENDPOINT_URL: &str = "https://dc.services.visualstudio.com/v2/track";

pub fn default_endpoint_url() -> String {
    DEFAULT_ENDPOINT_URL.to_string()
}

pub fn default_sampling_percentage() -> f64 {
    100.0
}

pub fn default_max_send_number() -> u32 {
    1
}

pub fn default_month_interval() -> u32 {
    3
}

pub fn default_day_interval() -> u32 {
    28
}

pub fn default_max_times_per_month() -> u32 {
    1
}

/// Statsbeat short interval, 15 minutes
pub fn default_short_interval_secs() -> u64 {
    900
}

pub fn default_max_batch_size() -> usize {
    100
}

pub fn default_max_retries() -> u32 {
    3
}

pub fn default_retry_delay_ms() -> u64 {
    1000
}

pub fn default_timeout() -> u64 {
    30
}

//! Statsbeat counter types and constants

/// Statsbeat instrumentation key outside the EU
pub const STATSBEAT_IKEY: &str = "c4a29126-a7cb-47e5-b348-11414998b11e";

/// Statsbeat instrumentation key for customers ingesting into EU regions
pub const STATSBEAT_EU_IKEY: &str = "7dc56bab-3c0c-4e9f-9ebb-d1acadee8d0f";

/// Value of the `language` property
pub const STATSBEAT_LANGUAGE: &str = "rust";

/// Region prefixes of EU ingestion hosts, e.g. `westeurope-5.in.applicationinsights.azure.com`
pub(super) const EU_REGIONS: &[&str] = &[
    "westeurope",
    "northeurope",
    "francecentral",
    "francesouth",
    "germanywestcentral",
    "norwayeast",
    "norwaywest",
    "swedencentral",
    "switzerlandnorth",
    "switzerlandwest",
    "uksouth",
    "ukwest",
];

/// Property names of an emitted statsbeat item
pub mod properties {
    pub const CIKEY: &str = "cikey";
    pub const HOST: &str = "host";
    pub const LANGUAGE: &str = "language";
    pub const VERSION: &str = "version";
    pub const REQUEST_DURATION: &str = "requestDuration";
    pub const REQUEST_SUCCESS: &str = "requestSuccess";
    pub const REQUEST_FAILURE: &str = "requestFailure";
    pub const RETRY_COUNT: &str = "retryCount";
    pub const THROTTLE_COUNT: &str = "throttleCount";
    pub const EXCEPTION_COUNT: &str = "exceptionCount";
}

/// Metric names of an emitted statsbeat item
pub mod metrics {
    pub const REQUEST_DURATION: &str = "Request_Duration";
    pub const REQUEST_SUCCESS: &str = "Request_Success_Count";
    pub const REQUEST_FAILURE: &str = "Request_Failure_Count";
    pub const RETRY_COUNT: &str = "Retry_Count";
    pub const THROTTLE_COUNT: &str = "Throttle_Count";
    pub const EXCEPTION_COUNT: &str = "Exception_Count";
}

/// Network outcomes for one host since the last flush
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CounterBucket {
    pub request_count: u64,
    pub duration_sum: f64,
    pub success_count: u64,
    pub failure_count: u64,
    pub retry_count: u64,
    pub throttle_count: u64,
    pub exception_count: u64,
}

impl CounterBucket {
    /// Nothing has been counted
    pub fn is_empty(&self) -> bool {
        self.request_count == 0
            && self.retry_count == 0
            && self.throttle_count == 0
            && self.exception_count == 0
    }

    /// Mean request duration in milliseconds
    pub fn average_duration(&self) -> Option<f64> {
        (self.request_count > 0).then(|| self.duration_sum / self.request_count as f64)
    }
}

//! Telemetry transport
//!
//! Envelopes are buffered by a [`Transport`] and delivered in batches when
//! `trigger_send` is called. [`HttpSender`] posts batches to an ingestion
//! endpoint and, when given a [`Statsbeat`](crate::core::statsbeat::Statsbeat)
//! handle, reports every network attempt to it.

mod http;
mod types;

pub use http::HttpSender;
pub use types::{DataPoint, Envelope, EnvelopeData, MetricData, METRIC_BASE_TYPE};

/// Buffering transport for telemetry envelopes
pub trait Transport: Send + Sync {
    /// Add an envelope to the outgoing buffer
    fn enqueue(&self, envelope: Envelope);

    /// Start delivery of everything buffered so far without waiting for it
    fn trigger_send(&self);
}

/// Ingestion accepted the whole batch (200) or part of it (206)
pub fn is_success_status(status: u16) -> bool {
    matches!(status, 200 | 206)
}

/// Status codes after which the same batch is sent again
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 439 | 500 | 502 | 503 | 504)
}

/// Status codes that mean the endpoint is throttling the client
pub fn is_throttle_status(status: u16) -> bool {
    matches!(status, 429 | 439)
}

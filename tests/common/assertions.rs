//! Custom test assertions

use aitelemetry_selfmon::core::sender::{Envelope, METRIC_BASE_TYPE};
use aitelemetry_selfmon::core::statsbeat::properties;

/// Assertions for statsbeat envelopes
pub trait EnvelopeAssertions {
    /// Assert the envelope is a metric item addressed to `ikey`
    fn assert_statsbeat_item(&self, ikey: &str);

    /// Assert the customer key and host properties
    fn assert_labels(&self, cikey: &str, host: &str);

    /// Assert a property value
    fn assert_property(&self, key: &str, expected: &str);
}

impl EnvelopeAssertions for Envelope {
    fn assert_statsbeat_item(&self, ikey: &str) {
        assert_eq!(
            self.name,
            format!("Microsoft.ApplicationInsights.{}.Metric", ikey.replace('-', ""))
        );
        assert_eq!(self.i_key, ikey);
        assert_eq!(self.data.base_type, METRIC_BASE_TYPE);
    }

    fn assert_labels(&self, cikey: &str, host: &str) {
        self.assert_property(properties::CIKEY, cikey);
        self.assert_property(properties::HOST, host);
    }

    fn assert_property(&self, key: &str, expected: &str) {
        assert_eq!(
            self.property(key),
            Some(expected),
            "Expected property {} to be {}",
            key,
            expected
        );
    }
}

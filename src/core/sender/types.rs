//! Wire types for telemetry envelopes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `baseType` of metric telemetry
pub const METRIC_BASE_TYPE: &str = "MetricData";

/// A single telemetry item as sent to the ingestion endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub name: String,
    pub time: DateTime<Utc>,
    #[serde(rename = "iKey")]
    pub i_key: String,
    pub data: EnvelopeData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeData {
    pub base_type: String,
    pub base_data: MetricData,
}

/// Metric payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricData {
    pub ver: u32,
    pub metrics: Vec<DataPoint>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// One aggregated metric value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl DataPoint {
    pub fn new<S: Into<String>>(name: S, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            count: None,
        }
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }
}

impl Envelope {
    /// Build a metric envelope addressed to `i_key`
    ///
    /// The envelope name embeds the key without dashes, e.g.
    /// `Microsoft.ApplicationInsights.c4a29126a7cb47e5b34811414998b11e.Metric`.
    pub fn metric(
        i_key: &str,
        metrics: Vec<DataPoint>,
        properties: BTreeMap<String, String>,
    ) -> Self {
        Self {
            name: Self::metric_name(i_key),
            time: Utc::now(),
            i_key: i_key.to_string(),
            data: EnvelopeData {
                base_type: METRIC_BASE_TYPE.to_string(),
                base_data: MetricData {
                    ver: 2,
                    metrics,
                    properties,
                },
            },
        }
    }

    pub fn metric_name(i_key: &str) -> String {
        format!("Microsoft.ApplicationInsights.{}.Metric", i_key.replace('-', ""))
    }

    /// Property of the metric payload
    pub fn property(&self, key: &str) -> Option<&str> {
        self.data.base_data.properties.get(key).map(String::as_str)
    }
}

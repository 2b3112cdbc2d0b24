//! Statsbeat counter collection and flushing

use super::types::{
    CounterBucket, EU_REGIONS, STATSBEAT_EU_IKEY, STATSBEAT_IKEY, STATSBEAT_LANGUAGE, metrics,
    properties,
};
use crate::config::{Config, DEFAULT_ENDPOINT_URL, SenderConfig, StatsbeatConfig};
use crate::core::sender::{DataPoint, Envelope, HttpSender, Transport};
use crate::utils::error::Result;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

struct StatsbeatInner {
    /// Customer instrumentation key, reported as `cikey`
    customer_ikey: String,
    /// Reserved key the items are addressed to
    statsbeat_ikey: &'static str,
    /// Private transport, never instrumented itself
    transport: Arc<dyn Transport>,
    buckets: Mutex<HashMap<String, CounterBucket>>,
}

/// Self-monitoring counters for outbound network attempts
///
/// A disabled instance holds no state and every call returns immediately.
pub struct Statsbeat {
    inner: Option<StatsbeatInner>,
}

impl Statsbeat {
    /// Create the counters with their own HTTP transport
    ///
    /// The transport posts to the reserved statsbeat endpoint, or to
    /// `config.statsbeat_endpoint` when set, and does not report back here.
    pub fn new(
        config: &StatsbeatConfig,
        instrumentation_key: &str,
        customer_endpoint: &str,
    ) -> Result<Self> {
        if config.disable_statsbeat {
            debug!("Statsbeat disabled by configuration");
            return Ok(Self::disabled());
        }

        let endpoint = config
            .statsbeat_endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT_URL.to_string());
        let sender = HttpSender::new(SenderConfig::for_endpoint(endpoint), None)?;

        Ok(Self::with_transport(
            config,
            instrumentation_key,
            customer_endpoint,
            Arc::new(sender),
        ))
    }

    /// Create the counters from the top-level configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.statsbeat,
            &config.instrumentation_key,
            &config.endpoint_url,
        )
    }

    /// Create the counters over a caller-supplied private transport
    pub fn with_transport(
        config: &StatsbeatConfig,
        instrumentation_key: &str,
        customer_endpoint: &str,
        transport: Arc<dyn Transport>,
    ) -> Self {
        if config.disable_statsbeat {
            return Self::disabled();
        }

        Self {
            inner: Some(StatsbeatInner {
                customer_ikey: instrumentation_key.to_string(),
                statsbeat_ikey: statsbeat_instrumentation_key(customer_endpoint),
                transport,
                buckets: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// An instance that ignores every call
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Key the emitted items are addressed to, `None` when disabled
    pub fn instrumentation_key(&self) -> Option<&'static str> {
        self.inner.as_ref().map(|inner| inner.statsbeat_ikey)
    }

    /// Record one request to `host`
    pub fn count_request(&self, host: &str, duration_ms: f64, success: bool) {
        self.with_bucket(host, |bucket| {
            bucket.request_count += 1;
            bucket.duration_sum += duration_ms;
            if success {
                bucket.success_count += 1;
            } else {
                bucket.failure_count += 1;
            }
        });
    }

    pub fn count_retry(&self, host: &str) {
        self.with_bucket(host, |bucket| bucket.retry_count += 1);
    }

    pub fn count_throttle(&self, host: &str) {
        self.with_bucket(host, |bucket| bucket.throttle_count += 1);
    }

    pub fn count_exception(&self, host: &str) {
        self.with_bucket(host, |bucket| bucket.exception_count += 1);
    }

    /// Current counters of `host`
    pub fn bucket(&self, host: &str) -> Option<CounterBucket> {
        let inner = self.inner.as_ref()?;
        inner.buckets.lock().get(host).cloned()
    }

    /// Emit one metric item per host with counts and reset every bucket
    ///
    /// Delivery is started but not awaited; counts are gone whatever the
    /// transport outcome. Returns the number of items handed to the
    /// transport.
    pub fn flush(&self) -> usize {
        let Some(inner) = &self.inner else {
            return 0;
        };

        let buckets = std::mem::take(&mut *inner.buckets.lock());
        let mut hosts: Vec<_> = buckets
            .into_iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .collect();
        if hosts.is_empty() {
            return 0;
        }
        hosts.sort_by(|a, b| a.0.cmp(&b.0));

        let emitted = hosts.len();
        for (host, bucket) in hosts {
            inner.transport.enqueue(inner.envelope(&host, &bucket));
        }
        inner.transport.trigger_send();

        debug!("Flushed statsbeat for {} hosts", emitted);
        emitted
    }

    fn with_bucket<F: FnOnce(&mut CounterBucket)>(&self, host: &str, f: F) {
        if let Some(inner) = &self.inner {
            let mut buckets = inner.buckets.lock();
            f(buckets.entry(host.to_string()).or_default());
        }
    }
}

impl StatsbeatInner {
    fn envelope(&self, host: &str, bucket: &CounterBucket) -> Envelope {
        let mut props = BTreeMap::new();
        props.insert(properties::CIKEY.to_string(), self.customer_ikey.clone());
        props.insert(properties::HOST.to_string(), host.to_string());
        props.insert(
            properties::LANGUAGE.to_string(),
            STATSBEAT_LANGUAGE.to_string(),
        );
        props.insert(
            properties::VERSION.to_string(),
            crate::VERSION.to_string(),
        );

        let mut points = Vec::new();

        if let Some(average) = bucket.average_duration() {
            props.insert(properties::REQUEST_DURATION.to_string(), average.to_string());
            points.push(
                DataPoint::new(metrics::REQUEST_DURATION, average).with_count(bucket.request_count),
            );
        }

        let counters = [
            (properties::REQUEST_SUCCESS, metrics::REQUEST_SUCCESS, bucket.success_count),
            (properties::REQUEST_FAILURE, metrics::REQUEST_FAILURE, bucket.failure_count),
            (properties::RETRY_COUNT, metrics::RETRY_COUNT, bucket.retry_count),
            (properties::THROTTLE_COUNT, metrics::THROTTLE_COUNT, bucket.throttle_count),
            (properties::EXCEPTION_COUNT, metrics::EXCEPTION_COUNT, bucket.exception_count),
        ];
        for (property, metric, value) in counters {
            if value > 0 {
                props.insert(property.to_string(), value.to_string());
                points.push(DataPoint::new(metric, value as f64));
            }
        }

        Envelope::metric(self.statsbeat_ikey, points, props)
    }
}

/// Statsbeat key for a customer ingesting into `customer_endpoint`
pub fn statsbeat_instrumentation_key(customer_endpoint: &str) -> &'static str {
    let host = url::Url::parse(customer_endpoint)
        .ok()
        .and_then(|url| url.host_str().map(str::to_lowercase));

    match host {
        Some(host) if is_eu_host(&host) => STATSBEAT_EU_IKEY,
        _ => STATSBEAT_IKEY,
    }
}

fn is_eu_host(host: &str) -> bool {
    EU_REGIONS.iter().any(|region| {
        host.strip_prefix(region)
            .is_some_and(|rest| rest.starts_with('-') || rest.starts_with('.'))
    })
}

impl std::fmt::Debug for Statsbeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            Some(inner) => f
                .debug_struct("Statsbeat")
                .field("cikey", &inner.customer_ikey)
                .field("ikey", &inner.statsbeat_ikey)
                .field("hosts", &inner.buckets.lock().len())
                .finish(),
            None => f.write_str("Statsbeat(disabled)"),
        }
    }
}

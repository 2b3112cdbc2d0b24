//! HTTP batch delivery

use super::types::Envelope;
use super::{Transport, is_success_status, is_throttle_status};
use crate::config::SenderConfig;
use crate::core::statsbeat::Statsbeat;
use crate::utils::error::{Result, TelemetryError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

struct SenderInner {
    config: SenderConfig,
    client: reqwest::Client,
    buffer: Mutex<Vec<Envelope>>,
    /// Receives one report per network attempt when set
    statsbeat: Option<Arc<Statsbeat>>,
}

/// Transport posting JSON batches to an ingestion endpoint
///
/// Cloning is cheap and every clone shares the same buffer.
#[derive(Clone)]
pub struct HttpSender {
    inner: Arc<SenderInner>,
}

impl HttpSender {
    /// Create a sender, reporting network outcomes to `statsbeat` if given
    pub fn new(config: SenderConfig, statsbeat: Option<Arc<Statsbeat>>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            inner: Arc::new(SenderInner {
                config,
                client,
                buffer: Mutex::new(Vec::new()),
                statsbeat,
            }),
        })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.inner.config.endpoint_url
    }

    /// Number of envelopes waiting for delivery
    pub fn buffered_len(&self) -> usize {
        self.inner.buffer.lock().len()
    }

    /// Deliver everything buffered, waiting for the outcome
    ///
    /// Returns the number of envelopes accepted by the endpoint. Batches that
    /// still fail after the configured retries are dropped and the last
    /// failure is returned.
    pub async fn send_now(&self) -> Result<usize> {
        let pending = std::mem::take(&mut *self.inner.buffer.lock());
        if pending.is_empty() {
            return Ok(0);
        }

        let batch_size = self.inner.config.max_batch_size.max(1);
        let mut delivered = 0;
        let mut last_error = None;

        for batch in pending.chunks(batch_size) {
            match self.send_batch(batch).await {
                Ok(()) => delivered += batch.len(),
                Err(e) => {
                    error!(
                        "Dropping batch of {} envelopes for {}: {}",
                        batch.len(),
                        self.endpoint_url(),
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(delivered),
        }
    }

    /// Post one batch, retrying transient failures with linear backoff
    pub async fn send_batch(&self, batch: &[Envelope]) -> Result<()> {
        let config = &self.inner.config;
        let body = serde_json::to_vec(batch)?;
        let mut attempt: u32 = 0;

        loop {
            let start_time = Instant::now();
            let outcome = self
                .inner
                .client
                .post(&config.endpoint_url)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone())
                .send()
                .await;
            let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

            let failure = match outcome {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if is_success_status(status) {
                        self.report_request(duration_ms, true);
                        debug!(
                            "Delivered {} envelopes to {} (status {})",
                            batch.len(),
                            config.endpoint_url,
                            status
                        );
                        return Ok(());
                    }

                    self.report_request(duration_ms, false);
                    if is_throttle_status(status) {
                        self.report(|statsbeat, host| statsbeat.count_throttle(host));
                    }

                    let message = response.text().await.unwrap_or_default();
                    TelemetryError::transport(status, message)
                }
                Err(e) => {
                    self.report(|statsbeat, host| statsbeat.count_exception(host));
                    TelemetryError::from(e)
                }
            };

            if !failure.is_retryable() || attempt >= config.max_retries {
                return Err(failure);
            }

            attempt += 1;
            self.report(|statsbeat, host| statsbeat.count_retry(host));
            warn!(
                "Delivery to {} failed ({}), retry {}/{}",
                config.endpoint_url, failure, attempt, config.max_retries
            );
            tokio::time::sleep(Duration::from_millis(
                config.retry_delay_ms.saturating_mul(u64::from(attempt)),
            ))
            .await;
        }
    }

    fn report_request(&self, duration_ms: f64, success: bool) {
        self.report(|statsbeat, host| statsbeat.count_request(host, duration_ms, success));
    }

    fn report<F: FnOnce(&Statsbeat, &str)>(&self, f: F) {
        if let Some(statsbeat) = &self.inner.statsbeat {
            f(statsbeat, &self.inner.config.endpoint_url);
        }
    }
}

impl Transport for HttpSender {
    fn enqueue(&self, envelope: Envelope) {
        self.inner.buffer.lock().push(envelope);
    }

    fn trigger_send(&self) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let sender = self.clone();
                handle.spawn(async move {
                    if let Err(e) = sender.send_now().await {
                        warn!("Background delivery failed: {}", e);
                    }
                });
            }
            Err(_) => {
                warn!(
                    "No async runtime available, keeping {} envelopes buffered",
                    self.buffered_len()
                );
            }
        }
    }
}

impl std::fmt::Debug for HttpSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSender")
            .field("endpoint_url", &self.inner.config.endpoint_url)
            .field("buffered", &self.buffered_len())
            .field("reports_statsbeat", &self.inner.statsbeat.is_some())
            .finish()
    }
}

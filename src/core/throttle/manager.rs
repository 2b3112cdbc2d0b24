//! Throttle manager implementation

use super::record::ThrottleRecord;
use super::sampler::{RandomSampler, Sampler};
use super::types::{PendingMessage, ThrottleResult};
use super::window;
use crate::config::{ThrottleMgrConfig, ThrottleMsgKey};
use crate::storage::KeyValueStore;
use crate::utils::logging::{DiagnosticLogger, InternalMessageId, LoggingSeverity};
use crate::utils::time::{Clock, SystemClock};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage key prefix, keys look like `appInsightsThrottle-1`
pub const DEFAULT_STORAGE_PREFIX: &str = "appInsightsThrottle";

#[derive(Debug, Default)]
struct ReadyState {
    ready: bool,
    queue: VecDeque<PendingMessage>,
}

/// Throttle gate for a set of diagnostic message categories
pub struct ThrottleManager {
    configs: HashMap<ThrottleMsgKey, ThrottleMgrConfig>,
    store: Arc<dyn KeyValueStore>,
    logger: Arc<dyn DiagnosticLogger>,
    clock: Arc<dyn Clock>,
    sampler: Arc<dyn Sampler>,
    prefix: String,
    state: Mutex<ReadyState>,
    /// Serializes read-modify-write cycles on the persisted records
    record_lock: Mutex<()>,
}

impl ThrottleManager {
    /// Create a manager over `configs`
    ///
    /// Categories without an entry use the default configuration. When a
    /// category appears more than once the last entry wins.
    pub fn new(
        configs: Vec<ThrottleMgrConfig>,
        store: Arc<dyn KeyValueStore>,
        logger: Arc<dyn DiagnosticLogger>,
    ) -> Self {
        let configs = configs.into_iter().map(|c| (c.msg_key, c)).collect();

        Self {
            configs,
            store,
            logger,
            clock: Arc::new(SystemClock),
            sampler: Arc::new(RandomSampler),
            prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            state: Mutex::new(ReadyState::default()),
            record_lock: Mutex::new(()),
        }
    }

    /// Use `clock` for "today"
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use `sampler` for the sampling gate
    pub fn with_sampler(mut self, sampler: Arc<dyn Sampler>) -> Self {
        self.sampler = sampler;
        self
    }

    /// Use `prefix` for storage keys instead of [`DEFAULT_STORAGE_PREFIX`]
    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Effective configuration of a category
    pub fn get_config(&self, key: ThrottleMsgKey) -> ThrottleMgrConfig {
        self.configs
            .get(&key)
            .cloned()
            .unwrap_or_else(|| ThrottleMgrConfig::for_key(key))
    }

    /// Storage key of a category's record
    pub fn storage_key(&self, key: ThrottleMsgKey) -> String {
        format!("{}-{}", self.prefix, key)
    }

    /// Decide whether the category's window is armed
    ///
    /// May initialise, arm or roll the persisted record. Never mutates
    /// anything for a disabled category.
    pub fn can_throttle(&self, key: ThrottleMsgKey) -> bool {
        let config = self.get_config(key);
        if config.disabled {
            return false;
        }

        let today = self.clock.today();
        let _guard = self.record_lock.lock();

        // A missing or unreadable record counts as a window that has long
        // elapsed; it is dated today so the next window is measured from here.
        let (mut record, fresh) = match self.load_record(key) {
            Some(record) => (record, false),
            None => {
                let record = ThrottleRecord::new(today);
                self.persist(key, &record);
                (record, true)
            }
        };

        // The ceiling only gates the answer, an armed flag is left in place
        if !window::within_monthly_ceiling(today, &config.interval) {
            debug!(key = %key, "Monthly throttle ceiling reached");
            return false;
        }

        if record.triggered {
            return true;
        }

        if !fresh && !window::is_window_open(record.date, today, &config.interval) {
            return false;
        }

        if record.send_count > 0 {
            // The quota of the previous arming was consumed; this boundary
            // starts the next window.
            debug!(key = %key, "Rolling spent throttle window to {}", today);
            self.persist(key, &ThrottleRecord::new(today));
            return false;
        }

        let sample = self.sampler.sample();
        if sample < config.limit.effective_sampling_percentage() {
            record.triggered = true;
            self.persist(key, &record);
            debug!(key = %key, sample, "Throttle window armed");
            true
        } else {
            self.persist(key, &ThrottleRecord::new(today));
            debug!(key = %key, sample, "Throttle window sampled out");
            false
        }
    }

    /// Persisted armed flag of a category, no side effects
    pub fn is_triggered(&self, key: ThrottleMsgKey) -> bool {
        self.load_record(key)
            .map(|record| record.triggered)
            .unwrap_or(false)
    }

    /// Whether `send` calls are evaluated rather than queued
    pub fn is_ready(&self) -> bool {
        self.state.lock().ready
    }

    /// Set the readiness flag, replaying queued sends when it becomes ready
    ///
    /// Returns whether any queued message was replayed.
    pub fn ready(&self, is_ready: bool) -> bool {
        self.state.lock().ready = is_ready;
        self.flush()
    }

    /// Replay queued sends in arrival order
    ///
    /// Does nothing while not ready. Returns whether the queue was non-empty.
    pub fn flush(&self) -> bool {
        let pending = {
            let mut state = self.state.lock();
            if !state.ready || state.queue.is_empty() {
                return false;
            }
            std::mem::take(&mut state.queue)
        };

        debug!("Replaying {} queued diagnostic messages", pending.len());
        for item in pending {
            self.evaluate_send(item.key, item.message_id, &item.message, item.severity);
        }
        true
    }

    /// Number of sends waiting for readiness
    pub fn queued_len(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Emit `message` at warning severity if the category's quota allows
    ///
    /// Returns `None` when the manager is not ready yet; the message is then
    /// queued and evaluated once readiness is signalled.
    pub fn send(
        &self,
        key: ThrottleMsgKey,
        message_id: InternalMessageId,
        message: &str,
    ) -> Option<ThrottleResult> {
        self.send_with_severity(key, message_id, message, LoggingSeverity::Warning)
    }

    /// Same as [`send`](Self::send) with an explicit severity
    pub fn send_with_severity(
        &self,
        key: ThrottleMsgKey,
        message_id: InternalMessageId,
        message: &str,
        severity: LoggingSeverity,
    ) -> Option<ThrottleResult> {
        {
            let mut state = self.state.lock();
            if !state.ready {
                state.queue.push_back(PendingMessage {
                    key,
                    message_id,
                    message: message.to_string(),
                    severity,
                });
                return None;
            }
        }

        Some(self.evaluate_send(key, message_id, message, severity))
    }

    fn evaluate_send(
        &self,
        key: ThrottleMsgKey,
        message_id: InternalMessageId,
        message: &str,
        severity: LoggingSeverity,
    ) -> ThrottleResult {
        let config = self.get_config(key);
        if config.disabled {
            return ThrottleResult::suppressed();
        }

        let result = {
            let _guard = self.record_lock.lock();
            let Some(mut record) = self.load_record(key) else {
                return ThrottleResult::suppressed();
            };
            if !record.triggered {
                return ThrottleResult::suppressed();
            }

            if record.send_count < config.limit.max_send_number {
                record.send_count += 1;
                self.persist(key, &record);
                ThrottleResult::emitted(record.send_count)
            } else {
                record.send_count = record.send_count.saturating_add(1);
                record.triggered = false;
                self.persist(key, &record);
                debug!(key = %key, "Throttle quota exhausted, window disarmed");
                ThrottleResult::suppressed()
            }
        };

        if result.is_throttled {
            self.logger.throw_internal(severity, message_id, message);
        }
        result
    }

    fn load_record(&self, key: ThrottleMsgKey) -> Option<ThrottleRecord> {
        let storage_key = self.storage_key(key);
        match self.store.get(&storage_key) {
            Ok(Some(value)) => match value.parse() {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!("Discarding unreadable throttle record {}: {}", storage_key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read throttle record {}: {}", storage_key, e);
                None
            }
        }
    }

    fn persist(&self, key: ThrottleMsgKey, record: &ThrottleRecord) {
        let storage_key = self.storage_key(key);
        if let Err(e) = self.store.set(&storage_key, &record.to_string()) {
            warn!("Failed to persist throttle record {}: {}", storage_key, e);
        }
    }
}

impl std::fmt::Debug for ThrottleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThrottleManager")
            .field("configs", &self.configs)
            .field("prefix", &self.prefix)
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}

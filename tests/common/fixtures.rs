//! Test fixtures and factories
//!
//! Factories build real components over deterministic collaborators: a pinned
//! clock, a fixed sampler and a recording logger.

use aitelemetry_selfmon::config::{
    ThrottleInterval, ThrottleLimit, ThrottleMgrConfig, ThrottleMsgKey,
};
use aitelemetry_selfmon::core::sender::{Envelope, Transport};
use aitelemetry_selfmon::core::throttle::{FixedSampler, ThrottleManager};
use aitelemetry_selfmon::storage::{KeyValueStore, LocalStore, MemoryStore};
use aitelemetry_selfmon::utils::logging::RecordingLogger;
use aitelemetry_selfmon::utils::time::FixedClock;
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Factory for throttle configurations
pub struct ThrottleConfigFactory;

impl ThrottleConfigFactory {
    /// Windows open immediately and always arm, one emission per window
    pub fn always(key: ThrottleMsgKey) -> ThrottleMgrConfig {
        ThrottleMgrConfig {
            msg_key: key,
            disabled: false,
            limit: ThrottleLimit {
                sampling_percentage: 100.0,
                max_send_number: 1,
            },
            interval: ThrottleInterval {
                month_interval: 0,
                day_interval: 0,
                max_times_per_month: 31,
            },
        }
    }

    /// Monthly windows with a quota of `max_send_number`
    pub fn monthly(key: ThrottleMsgKey, max_send_number: u32) -> ThrottleMgrConfig {
        let mut config = Self::always(key);
        config.limit.max_send_number = max_send_number;
        config.interval.month_interval = 1;
        config.interval.day_interval = 1;
        config
    }

    pub fn disabled(key: ThrottleMsgKey) -> ThrottleMgrConfig {
        let mut config = Self::always(key);
        config.disabled = true;
        config
    }
}

/// A throttle manager with handles on all of its collaborators
pub struct ThrottleHarness {
    pub manager: ThrottleManager,
    pub store: Arc<dyn KeyValueStore>,
    pub logger: Arc<RecordingLogger>,
    pub clock: Arc<FixedClock>,
    pub sampler: Arc<FixedSampler>,
}

impl ThrottleHarness {
    pub fn in_memory(configs: Vec<ThrottleMgrConfig>, today: NaiveDate) -> Self {
        Self::with_store(configs, Arc::new(MemoryStore::new()), today)
    }

    pub fn on_disk(configs: Vec<ThrottleMgrConfig>, path: &Path, today: NaiveDate) -> Self {
        let store = LocalStore::open(path).unwrap();
        Self::with_store(configs, Arc::new(store), today)
    }

    pub fn with_store(
        configs: Vec<ThrottleMgrConfig>,
        store: Arc<dyn KeyValueStore>,
        today: NaiveDate,
    ) -> Self {
        let logger = Arc::new(RecordingLogger::new());
        let clock = Arc::new(FixedClock::new(today));
        let sampler = Arc::new(FixedSampler::new(0.0));
        let manager = ThrottleManager::new(configs, store.clone(), logger.clone())
            .with_clock(clock.clone())
            .with_sampler(sampler.clone());

        Self {
            manager,
            store,
            logger,
            clock,
            sampler,
        }
    }

    /// Persisted record of a category
    pub fn record(&self, key: ThrottleMsgKey) -> Option<String> {
        self.store.get(&self.manager.storage_key(key)).unwrap()
    }
}

/// Transport that keeps every envelope it is given
#[derive(Default)]
pub struct CapturingTransport {
    envelopes: Mutex<Vec<Envelope>>,
    triggers: Mutex<usize>,
}

impl CapturingTransport {
    pub fn envelopes(&self) -> Vec<Envelope> {
        self.envelopes.lock().clone()
    }

    pub fn trigger_count(&self) -> usize {
        *self.triggers.lock()
    }
}

impl Transport for CapturingTransport {
    fn enqueue(&self, envelope: Envelope) {
        self.envelopes.lock().push(envelope);
    }

    fn trigger_send(&self) {
        *self.triggers.lock() += 1;
    }
}

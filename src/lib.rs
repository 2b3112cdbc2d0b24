//! # aitelemetry-selfmon
//!
//! Self-governance for a telemetry client: a persistent throttle gate that
//! limits how often an internal diagnostic message (deprecation notices and
//! the like) reaches the customer's log, and statsbeat counters that report
//! the client's own network health to an SDK-reserved destination.
//!
//! ## Features
//!
//! - **Throttle gate**: per-category windows measured in calendar months and
//!   days, a sampling gate, a per-window emission quota and a monthly ceiling,
//!   all persisted in a key-value store so they survive restarts
//! - **Readiness queue**: messages sent before the host is ready are replayed
//!   in order once it is
//! - **Statsbeat**: per-host request, retry, throttle and exception counters
//!   flushed as metric envelopes over a transport that is never measured
//!   itself
//! - **HTTP transport**: batched JSON delivery with bounded linear retries
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aitelemetry_selfmon::{Config, SelfMonitor, ThrottleMsgKey, InternalMessageId};
//! use aitelemetry_selfmon::storage::LocalStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/telemetry.yaml").await?;
//!     let store = Arc::new(LocalStore::open("throttle.json")?);
//!     let monitor = SelfMonitor::new(config, store)?;
//!     monitor.start();
//!
//!     let throttle = monitor.throttle();
//!     throttle.ready(true);
//!     if throttle.can_throttle(ThrottleMsgKey::IkeyDeprecate) {
//!         throttle.send(
//!             ThrottleMsgKey::IkeyDeprecate,
//!             InternalMessageId::InstrumentationKeyDeprecation,
//!             "Instrumentation key support will end soon",
//!         );
//!     }
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::{Config, ThrottleMgrConfig, ThrottleMsgKey};
pub use crate::core::sender::{Envelope, HttpSender, Transport};
pub use crate::core::statsbeat::{Statsbeat, spawn_flush_task};
pub use crate::core::throttle::{ThrottleManager, ThrottleResult};
pub use utils::error::{Result, TelemetryError};
pub use utils::logging::{DiagnosticLogger, InternalMessageId, LoggingSeverity};

use std::sync::Arc;
use std::time::Duration;
use storage::KeyValueStore;
use tokio::task::JoinHandle;
use tracing::info;
use utils::logging::TracingDiagnosticLogger;

/// The self-governance components wired from one configuration
///
/// The customer sender reports every network attempt to the statsbeat
/// counters; the counters deliver through a sender of their own.
pub struct SelfMonitor {
    config: Config,
    throttle: Arc<ThrottleManager>,
    statsbeat: Arc<Statsbeat>,
    sender: HttpSender,
    flush_task: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl SelfMonitor {
    /// Build the components, logging throttled messages through `tracing`
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        Self::with_logger(config, store, Arc::new(TracingDiagnosticLogger))
    }

    /// Build the components with a caller-supplied diagnostic logger
    pub fn with_logger(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        logger: Arc<dyn DiagnosticLogger>,
    ) -> Result<Self> {
        info!("Creating self-monitoring components");

        let throttle = Arc::new(ThrottleManager::new(
            config.throttle.clone(),
            store,
            logger,
        ));
        let statsbeat = Arc::new(Statsbeat::from_config(&config)?);
        let sender = HttpSender::new(config.sender.clone(), Some(statsbeat.clone()))?;

        Ok(Self {
            config,
            throttle,
            statsbeat,
            sender,
            flush_task: parking_lot::Mutex::new(None),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn throttle(&self) -> &Arc<ThrottleManager> {
        &self.throttle
    }

    pub fn statsbeat(&self) -> &Arc<Statsbeat> {
        &self.statsbeat
    }

    /// Transport for customer telemetry
    pub fn sender(&self) -> &HttpSender {
        &self.sender
    }

    /// Start the periodic statsbeat flush on the current runtime
    ///
    /// Returns whether a task is running afterwards.
    pub fn start(&self) -> bool {
        let mut task = self.flush_task.lock();
        if task.is_none() {
            let interval = Duration::from_secs(self.config.statsbeat.short_interval_secs.max(1));
            *task = spawn_flush_task(self.statsbeat.clone(), interval);
        }
        task.is_some()
    }

    /// Stop the periodic flush and emit what has been counted so far
    pub fn shutdown(&self) {
        if let Some(task) = self.flush_task.lock().take() {
            task.abort();
        }
        self.statsbeat.flush();
        info!("Self-monitoring stopped");
    }
}

impl std::fmt::Debug for SelfMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelfMonitor")
            .field("throttle", &self.throttle)
            .field("statsbeat", &self.statsbeat)
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}

// Version information
/// Current version of the crate, reported as the statsbeat `version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

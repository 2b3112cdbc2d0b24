//! Periodic statsbeat flushing

use super::collector::Statsbeat;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Shortest period the flush task will tick at
pub const MIN_FLUSH_INTERVAL: Duration = Duration::from_millis(100);

/// Flush `statsbeat` every `interval` on the current tokio runtime
///
/// Intervals below [`MIN_FLUSH_INTERVAL`] are raised to it. Returns `None`
/// for a disabled instance or when no runtime is running. Abort the returned
/// handle to stop flushing.
pub fn spawn_flush_task(statsbeat: Arc<Statsbeat>, interval: Duration) -> Option<JoinHandle<()>> {
    if !statsbeat.is_enabled() {
        return None;
    }
    let interval = interval.max(MIN_FLUSH_INTERVAL);

    let handle = match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => {
            warn!("No async runtime available, statsbeat will only flush manually");
            return None;
        }
    };

    debug!("Starting statsbeat flush task every {:?}", interval);
    Some(handle.spawn(async move {
        let start = tokio::time::Instant::now() + interval;
        let mut ticker = tokio::time::interval_at(start, interval);

        loop {
            ticker.tick().await;
            statsbeat.flush();
        }
    }))
}

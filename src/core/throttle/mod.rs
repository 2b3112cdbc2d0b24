//! Diagnostic throttle gate
//!
//! Decides, per message category, whether an internal diagnostic may be
//! surfaced to the customer. The decision only uses a compact record in the
//! client's own key-value store: a calendar window, a sampling gate and a
//! per-window send quota.
//!
//! ```text
//! Unarmed --(window open, sampled in)--> Armed --(quota consumed)--> Unarmed
//! ```
//!
//! A disabled category short-circuits every transition.

mod manager;
mod record;
mod sampler;
mod types;
mod window;


pub use manager::{DEFAULT_STORAGE_PREFIX, ThrottleManager};
pub use record::ThrottleRecord;
pub use sampler::{FixedSampler, RandomSampler, Sampler};
pub use types::{PendingMessage, ThrottleResult};

//! Persistent key-value storage
//!
//! Throttle records live in a per-client key-value store. Two backends are
//! provided: an in-memory map and a JSON file on local disk.

mod local;
mod memory;

pub use local::LocalStore;
pub use memory::MemoryStore;

use crate::utils::error::Result;

/// Synchronous string key-value store
///
/// Calls are expected to be fast and local. Implementations must tolerate
/// another writer having replaced a value since the last read; the policy is
/// last writer wins.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write or replace a value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value, returning whether it existed
    fn remove(&self, key: &str) -> Result<bool>;
}

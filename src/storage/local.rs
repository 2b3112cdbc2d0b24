//! Local file system store

use super::KeyValueStore;
use crate::utils::error::{Result, TelemetryError};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Store persisted as a single JSON object on disk
///
/// Every read goes to disk so a value written by another process is picked
/// up on the next `get`. Writes replace the file through a rename.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalStore {
    /// Open (or create) the store file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    TelemetryError::storage(format!("Failed to create storage directory: {}", e))
                })?;
            }
        }

        if !path.exists() {
            fs::write(&path, "{}").map_err(|e| {
                TelemetryError::storage(format!("Failed to create store file: {}", e))
            })?;
        }

        info!("Local key-value store opened at: {}", path.display());
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(TelemetryError::storage(format!(
                    "Failed to read store file: {}",
                    e
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let tmp_path = self.path.with_extension("tmp");
        let content = serde_json::to_string_pretty(entries)?;

        fs::write(&tmp_path, content)
            .map_err(|e| TelemetryError::storage(format!("Failed to write store file: {}", e)))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| TelemetryError::storage(format!("Failed to replace store file: {}", e)))?;

        Ok(())
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock();
        // A corrupt file is replaced rather than blocking every later write.
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)?;

        debug!("Stored key {} in {}", key, self.path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let _guard = self.write_lock.lock();
        let mut entries = self.read_all()?;
        let existed = entries.remove(key).is_some();
        if existed {
            self.write_all(&entries)?;
        }
        Ok(existed)
    }
}

//! Durable key/value storage behind the session store.
//!
//! Values are opaque strings keyed by name, the same contract a browser's
//! local storage offers. Writes are synchronous and each key is replaced
//! atomically; there is no cross-key transaction.

use crate::error::SessionError;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// A string key/value store that survives process restarts (or not, for tests).
pub trait SessionStorage: Send + Sync + Debug {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// In-process storage, mainly for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON object file.
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so readers see either the old or the new content. Separate
/// processes writing the same file get last-write-wins.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .map_err(|e| SessionError::Corrupt(format!("{}: {}", self.path.display(), e)))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        debug!("Session storage written to {}", self.path.display());
        Ok(())
    }

    /// Runs `change` on the current entries and persists the result.
    ///
    /// A corrupt file is replaced rather than blocking every future write.
    fn update<F>(&self, change: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(SessionError::Corrupt(reason)) => {
                warn!("Discarding corrupt session storage: {}", reason);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        change(&mut entries);
        self.write_entries(&entries)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.read_entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

//! In-memory store

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::PostStore;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
struct Entry {
    data: Vec<u8>,
    modified: SystemTime,
}

/// Logical clock shared by every memory store, one tick per write
static CLOCK: AtomicU64 = AtomicU64::new(0);

/// A store kept entirely in memory.
///
/// Modification times come from a logical clock that advances one second
/// per write, shared across stores, so write order is always reflected in
/// the timestamps, even between a raw and a build store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the modification time of an existing entry
    pub fn set_modified(&self, name: &str, modified: SystemTime) {
        if let Some(entry) = self.lock().get_mut(name) {
            entry.modified = modified;
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Entry>> {
        // Entries are replaced whole, so a poisoned map is still consistent
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PostStore for MemoryStore {
    fn list(&self) -> Result<Vec<String>> {
        Ok(self.lock().keys().cloned().collect())
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        self.lock()
            .get(name)
            .map(|entry| entry.data.clone())
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    fn write(&self, name: &str, data: &[u8]) -> Result<()> {
        let tick = CLOCK.fetch_add(1, Ordering::SeqCst) + 1;
        let modified = UNIX_EPOCH + Duration::from_secs(tick);
        self.lock().insert(
            name.to_string(),
            Entry {
                data: data.to_vec(),
                modified,
            },
        );
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.lock().remove(name);
        Ok(())
    }

    fn modified(&self, name: &str) -> Result<Option<SystemTime>> {
        Ok(self.lock().get(name).map(|entry| entry.modified))
    }
}

//! Post store gateway
//!
//! A store is one flat directory of named files: the raw store holds post
//! sources, the build store holds rendered output. The pipeline only talks
//! to stores through [`PostStore`], so tests can swap in [`MemoryStore`].

mod fs;
mod memory;

use std::time::SystemTime;

use crate::error::Result;

pub use fs::FsStore;
pub use memory::MemoryStore;

/// Storage operations the build pipeline needs.
///
/// There is no locking: two writers to the same name race and the last
/// completed write wins.
pub trait PostStore: Send + Sync {
    /// Names of all files in the store, sorted by name
    fn list(&self) -> Result<Vec<String>>;

    /// Full contents of `name`; a missing file is `NotFound`
    fn read(&self, name: &str) -> Result<Vec<u8>>;

    /// Replace `name` with `data`. Readers never observe a partial write.
    fn write(&self, name: &str, data: &[u8]) -> Result<()>;

    /// Remove `name`. Removing a missing file succeeds.
    fn remove(&self, name: &str) -> Result<()>;

    /// Last modification time of `name`, `None` if it does not exist
    fn modified(&self, name: &str) -> Result<Option<SystemTime>>;

    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.modified(name)?.is_some())
    }
}

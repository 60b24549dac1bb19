//! Directory-backed store

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tempfile::NamedTempFile;
use walkdir::WalkDir;

use super::PostStore;
use crate::error::{Error, Result};

/// A store rooted at one directory on disk.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so a failed write never leaves a truncated artifact.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl PostStore for FsStore {
    fn list(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::io(&self.root, io::Error::from(e)))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            } else {
                tracing::debug!("Skipping non UTF-8 file name {:?}", entry.path());
            }
        }

        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path(name);
        fs::read(&path).map_err(|e| Error::io(path, e))
    }

    fn write(&self, name: &str, data: &[u8]) -> Result<()> {
        let path = self.path(name);
        fs::create_dir_all(&self.root).map_err(|e| Error::io(&self.root, e))?;

        let mut tmp = NamedTempFile::new_in(&self.root).map_err(|e| Error::io(&self.root, e))?;
        tmp.write_all(data).map_err(|e| Error::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| Error::io(tmp.path(), e))?;
        tmp.persist(&path).map_err(|e| Error::io(&path, e.error))?;

        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        let path = self.path(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(path, e)),
        }
    }

    fn modified(&self, name: &str) -> Result<Option<SystemTime>> {
        let path = self.path(name);
        match fs::metadata(&path) {
            Ok(meta) => meta
                .modified()
                .map(Some)
                .map_err(|e| Error::Io { path, source: e }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io { path, source: e }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs::File;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_write_creates_root_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path().join("build"));

        store.write("a.html", b"<p>a</p>").unwrap();
        assert_eq!(store.read("a.html").unwrap(), b"<p>a</p>");

        store.write("a.html", b"<p>b</p>").unwrap();
        assert_eq!(store.read("a.html").unwrap(), b"<p>b</p>");
    }

    #[test]
    fn test_list_is_sorted_and_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        store.write("c.md", b"").unwrap();
        store.write("a.md", b"").unwrap();
        store.write("b.txt", b"").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        assert_eq!(store.list().unwrap(), ["a.md", "b.txt", "c.md"]);
    }

    #[test]
    fn test_list_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path().join("nope"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        assert_eq!(store.read("a.md").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        store.write("a.md", b"x").unwrap();

        store.remove("a.md").unwrap();
        store.remove("a.md").unwrap();
        assert!(!store.exists("a.md").unwrap());
    }

    #[test]
    fn test_modified() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        assert_eq!(store.modified("a.md").unwrap(), None);

        store.write("a.md", b"x").unwrap();
        let pinned = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        File::options()
            .write(true)
            .open(dir.path().join("a.md"))
            .unwrap()
            .set_modified(pinned)
            .unwrap();

        assert_eq!(store.modified("a.md").unwrap(), Some(pinned));
    }
}

//! In-memory file system for tests and embedding.
//!
//! Files live in a `HashMap` keyed by path.  Writes can be made to fail on
//! demand, and every successful write is counted so tests can assert that an
//! operation did (or did not) touch storage.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::FileSystem;

/// A [`FileSystem`] that keeps files in memory.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
    writes: Mutex<u32>,
    fail_writes: Mutex<bool>,
}

impl MemoryFileSystem {
    /// Creates an empty file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty file system already wrapped for sharing with a store.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Places a file without counting it as a write.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files
            .lock()
            .expect("lock poisoned")
            .insert(path.into(), contents.into());
    }

    /// Returns the content of the file at `path`, if any.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .lock()
            .expect("lock poisoned")
            .get(path.as_ref())
            .cloned()
    }

    /// Deletes the file at `path`, returning whether it existed.
    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        self.files
            .lock()
            .expect("lock poisoned")
            .remove(path.as_ref())
            .is_some()
    }

    /// Number of successful [`FileSystem::write`] calls so far.
    pub fn write_count(&self) -> u32 {
        *self.writes.lock().expect("lock poisoned")
    }

    /// Makes subsequent writes fail with `PermissionDenied`.
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().expect("lock poisoned") = fail;
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        Ok(self
            .files
            .lock()
            .expect("lock poisoned")
            .contains_key(path))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if *self.fail_writes.lock().expect("lock poisoned") {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", path.display()),
            ));
        }
        self.insert(path, contents);
        *self.writes.lock().expect("lock poisoned") += 1;
        Ok(())
    }
}

//! File-system seam used by the load/save orchestration.
//!
//! The orchestration only ever needs three primitives: an existence check,
//! "read the whole file as text" and "replace the whole file with this text".
//! [`OsFileSystem`] maps them onto `std::fs`; [`memory::MemoryFileSystem`]
//! keeps files in a map so tests and embedders can run without touching disk.
//!
//! # Testability
//!
//! The [`FileSystem`] trait lets unit tests inject failures (or assert that no
//! write happened) without creating real files.

use std::io;
use std::path::Path;

pub mod memory;

/// The three file primitives the config layer depends on.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystem: Send + Sync {
    /// Returns whether a file exists at `path`.  Errors only when existence
    /// cannot be determined (e.g. permission denied on a parent directory).
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Reads the whole file as UTF-8 text.  Fails with
    /// [`io::ErrorKind::NotFound`] when the file is absent.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replaces the file content with `contents`, creating the file if needed.
    /// No atomicity is promised: a failed write may leave a truncated file.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem {
    create_parent_dirs: bool,
}

impl OsFileSystem {
    /// Writes fail when the target directory does not exist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes create missing parent directories first.
    pub fn creating_parent_dirs() -> Self {
        Self {
            create_parent_dirs: true,
        }
    }
}

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if self.create_parent_dirs {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)?;
            }
        }
        std::fs::write(path, contents)
    }
}

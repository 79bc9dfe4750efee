//! Compiling flag: a per-application-version marker file
//!
//! While the flag exists, detect declines. During compile the buildpack
//! library runs detect over every installed buildpack, this one included, so
//! the flag is what keeps the decorator from selecting itself a second time.
//!
//! The flag is advisory. It only covers retries of the same version on the
//! same host, and relies on plain file creation for atomicity.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Marker file saying "a compile is in progress for this version"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilingFlag {
    path: PathBuf,
}

impl CompilingFlag {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the marker file exists
    pub fn is_set(&self) -> bool {
        self.path.exists()
    }

    /// Creates the marker file, leaving an existing one in place
    pub fn set(&self) -> io::Result<()> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        debug!("Compiling flag set: {}", self.path.display());
        Ok(())
    }

    /// Removes the marker file; a missing file is not an error
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Compiling flag cleared: {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Sets the flag and returns a guard that clears it when dropped
    pub fn acquire(&self) -> io::Result<CompilingGuard<'_>> {
        self.set()?;
        Ok(CompilingGuard { flag: self })
    }
}

/// RAII guard for a set [`CompilingFlag`]
///
/// Dropping the guard clears the flag on every exit path, including early
/// returns through `?` and unwinding panics.
#[derive(Debug)]
pub struct CompilingGuard<'a> {
    flag: &'a CompilingFlag,
}

impl CompilingGuard<'_> {
    pub fn flag(&self) -> &CompilingFlag {
        self.flag
    }
}

impl Drop for CompilingGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.flag.clear() {
            warn!(
                "Failed to clear compiling flag {}: {}",
                self.flag.path().display(),
                e
            );
        }
    }
}

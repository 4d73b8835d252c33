//! Cycle-level mutual exclusion.
//!
//! An external timer may misfire and start a second cycle while one
//! is still running. Two concurrent cycles would both observe the old
//! stored IP and both call the provider — wasteful, though not
//! corrupting (the file store's atomic rename makes the final save
//! last-writer-wins). The lock spans the whole load→save window: the
//! caller acquires it before constructing the reconciler and holds it
//! until the cycle outcome is known.
//!
//! The guard is a lock file created with `create_new` semantics and
//! removed on drop. A cycle killed with SIGKILL leaves the file
//! behind; the error message names the path so an operator can remove
//! it after checking no cycle is running.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Held for the duration of one reconciliation cycle
#[derive(Debug)]
pub struct CycleLock {
    path: PathBuf,
}

impl CycleLock {
    /// Acquire the lock at `path`
    ///
    /// # Errors
    ///
    /// [`Error::CycleLocked`] if the lock file already exists, i.e.
    /// another cycle holds it (or a killed cycle left it behind).
    pub fn acquire<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    Error::CycleLocked(format!(
                        "{} exists; another cycle is running, or a crashed one left it behind",
                        path.display()
                    ))
                } else {
                    Error::state_io(format!(
                        "failed to create lock file {}: {}",
                        path.display(),
                        e
                    ))
                }
            })?;

        // Best effort: record the owner pid for the operator.
        let _ = writeln!(file, "{}", std::process::id());

        Ok(Self { path })
    }
}

impl Drop for CycleLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("failed to remove lock file {}: {}", self.path.display(), e);
        }
    }
}

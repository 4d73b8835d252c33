// # File State Store
//
// Persists the reconciliation record as a single JSON file at a
// fixed, well-known path.
//
// ## Durability
//
// - Atomic writes: the new record goes to `<path>.tmp` first, then
//   replaces the target via `rename`. A crash mid-save leaves either
//   the old record or the new one, never a torn file.
// - No caching: the record is also read by future process
//   invocations, so every load and save goes to disk.
//
// A missing file is reported as `StateNotFound` — "setup required" —
// while a present-but-unreadable file is a plain I/O error. The two
// must stay distinct: only the former is fixable by re-running setup.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::state::ReconcileState;
use crate::traits::StateStore;

/// File-backed state store with atomic writes
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Create a store around `path`. The file itself is created by
    /// the setup step, not here; a load before setup fails with
    /// `StateNotFound`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the temporary file used for atomic replacement
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self) -> Result<ReconcileState> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::StateNotFound);
            }
            Err(e) => {
                return Err(Error::state_io(format!(
                    "failed to read state file {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        serde_json::from_str(&content).map_err(|e| {
            Error::state_io(format!(
                "failed to parse state file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn save(&self, state: &ReconcileState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| Error::state_io(format!("failed to serialize state: {}", e)))?;

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::state_io(format!(
                    "failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::state_io(format!(
                    "failed to write temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::state_io(format!(
                    "failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::state_io(format!(
                "failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!("state written to {}", self.path.display());
        Ok(())
    }
}

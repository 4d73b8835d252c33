// # Memory State Store
//
// Non-durable store holding the single reconciliation record in
// memory. State is lost on process exit, which makes every restart a
// "setup required" start unless seeded with `with_state`.
//
// Used by tests and by embedders that manage durability themselves.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::state::ReconcileState;
use crate::traits::StateStore;

/// In-memory state store
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<Mutex<Option<ReconcileState>>>,
}

impl MemoryStateStore {
    /// Create an empty store; `load` fails with `StateNotFound`
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a record
    pub fn with_state(state: ReconcileState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(state))),
        }
    }

    /// Snapshot of the current record, if any
    pub async fn current(&self) -> Option<ReconcileState> {
        self.inner.lock().await.clone()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self) -> Result<ReconcileState> {
        self.inner.lock().await.clone().ok_or(Error::StateNotFound)
    }

    async fn save(&self, state: &ReconcileState) -> Result<()> {
        *self.inner.lock().await = Some(state.clone());
        Ok(())
    }
}

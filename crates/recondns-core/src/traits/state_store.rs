// # State Store Trait
//
// Load/save the persisted reconciliation record.
//
// The record is the single source of truth between independent
// invocations of the whole program, so implementations must not
// cache: every `load` and `save` is a fresh durable round-trip.
// `save` must be atomic — a crash mid-save may leave the old record
// or the new record on disk, never a torn one.

use async_trait::async_trait;

use crate::error::Result;
use crate::state::ReconcileState;

/// Trait for state store implementations
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the persisted record
    ///
    /// # Errors
    ///
    /// - [`Error::StateNotFound`](crate::Error::StateNotFound) if no
    ///   record has ever been written (setup has not run)
    /// - [`Error::StateIo`](crate::Error::StateIo) for read or parse
    ///   failures of an existing record
    async fn load(&self) -> Result<ReconcileState>;

    /// Durably write the full record, replacing any previous one
    async fn save(&self, state: &ReconcileState) -> Result<()>;
}

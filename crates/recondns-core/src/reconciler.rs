//! The reconciliation cycle.
//!
//! One cycle runs load → resolve → decide → (update → persist):
//!
//! 1. Load the persisted record. A missing record means setup never
//!    ran; the cycle ends with [`CycleOutcome::SetupRequired`].
//! 2. Resolve the current public IP. If the whole source chain
//!    fails, the cycle ends with no side effects.
//! 3. An update is required when the resolved IP differs from the
//!    stored one or `first_run` is still set.
//! 4. Apply the update, then persist `{ip, first_run: false}` with
//!    the provider bundle carried over verbatim. State is only ever
//!    written after the provider confirmed, so the record can never
//!    claim an IP that was not applied. If the save itself fails the
//!    provider and the record now disagree; the next cycle sees the
//!    stale `ip`, re-applies the same value (idempotent at the
//!    provider) and saves again.
//!
//! Every failure is converted into an outcome here; nothing escapes
//! to crash the process. Cycles are independent — retry timing
//! belongs to the external scheduler.

use std::net::IpAddr;

use tracing::{error, info, warn};

use crate::error::Error;
use crate::resolver::IpResolver;
use crate::traits::{DnsUpdater, StateStore};

/// Result of one reconciliation cycle
#[derive(Debug)]
pub enum CycleOutcome {
    /// Provider updated and new state persisted
    Updated {
        /// The IP that was applied
        ip: IpAddr,
        /// The IP source that resolved it
        source: &'static str,
    },

    /// Current IP matches the stored one; no calls, no writes
    NoChange {
        /// The resolved current IP
        ip: IpAddr,
    },

    /// No persisted record exists; external setup must run first
    SetupRequired,

    /// The record exists but could not be read or parsed
    LoadFailed {
        /// The underlying state store error
        error: Error,
    },

    /// All IP sources failed; state left untouched
    ResolutionFailed {
        /// The resolver error
        error: Error,
    },

    /// The provider rejected the update or was unreachable; state
    /// left exactly as loaded so the next cycle retries
    UpdateFailed {
        /// The provider error
        error: Error,
    },

    /// Provider accepted the update but the save failed; local state
    /// is stale and the next cycle performs a redundant, idempotent
    /// update
    PersistFailed {
        /// The state store error
        error: Error,
    },
}

/// Orchestrates one reconciliation cycle
///
/// Single-threaded, run-to-completion: one load, one resolve (with
/// sequential fallback), at most one provider call, at most one save.
pub struct Reconciler {
    state_store: Box<dyn StateStore>,
    resolver: IpResolver,
    updater: Box<dyn DnsUpdater>,
}

impl Reconciler {
    /// Create a reconciler over the given store, resolver and updater
    pub fn new(
        state_store: Box<dyn StateStore>,
        resolver: IpResolver,
        updater: Box<dyn DnsUpdater>,
    ) -> Self {
        Self {
            state_store,
            resolver,
            updater,
        }
    }

    /// Run one reconciliation cycle
    pub async fn run_once(&self) -> CycleOutcome {
        let state = match self.state_store.load().await {
            Ok(state) => state,
            Err(Error::StateNotFound) => {
                warn!("no persisted state found; run the setup step before reconciling");
                return CycleOutcome::SetupRequired;
            }
            Err(error) => {
                error!("failed to load persisted state: {}", error);
                return CycleOutcome::LoadFailed { error };
            }
        };

        let resolved = match self.resolver.resolve().await {
            Ok(resolved) => resolved,
            Err(error) => {
                warn!("could not determine current public IP: {}", error);
                return CycleOutcome::ResolutionFailed { error };
            }
        };
        info!(
            "current public IP is {} (via {})",
            resolved.ip, resolved.source
        );

        if !state.needs_update(resolved.ip) {
            info!("no IP change detected, record already points at {}", resolved.ip);
            return CycleOutcome::NoChange { ip: resolved.ip };
        }

        if state.first_run {
            info!("first run, seeding provider record with {}", resolved.ip);
        } else {
            info!("IP change detected: {:?} -> {}", state.ip, resolved.ip);
        }

        if let Err(error) = self
            .updater
            .apply_update(&state.provider, resolved.ip)
            .await
        {
            error!(
                "{} update failed, keeping state as loaded: {}",
                self.updater.name(),
                error
            );
            return CycleOutcome::UpdateFailed { error };
        }

        let next = state.applied(resolved.ip);
        if let Err(error) = self.state_store.save(&next).await {
            error!(
                "{} accepted {} but saving state failed: {}; next cycle will re-apply",
                self.updater.name(),
                resolved.ip,
                error
            );
            return CycleOutcome::PersistFailed { error };
        }

        info!(
            "record updated to {} via {} and state persisted",
            resolved.ip,
            self.updater.name()
        );
        CycleOutcome::Updated {
            ip: resolved.ip,
            source: resolved.source,
        }
    }
}

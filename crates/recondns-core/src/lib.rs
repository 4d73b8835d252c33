// # recondns-core
//
// Core library for the recondns reconciliation loop.
//
// One invocation performs one reconciliation cycle:
// - **StateStore**: load the last-applied IP and provider bundle
// - **IpResolver**: determine the current public IP via a fallback
//   chain of IP-echo sources
// - **DnsUpdater**: push a changed IP to the DNS provider
// - **Reconciler**: orchestrate the above and persist new state only
//   after the provider confirms
//
// Periodic invocation is owned by an external scheduler (cron or a
// systemd timer); nothing in this crate loops or sleeps.

pub mod error;
pub mod lock;
pub mod reconciler;
pub mod resolver;
pub mod state;
pub mod store;
pub mod traits;

pub use error::{Error, Result};
pub use lock::CycleLock;
pub use reconciler::{CycleOutcome, Reconciler};
pub use resolver::{IpResolver, ResolvedIp};
pub use state::{ProviderBundle, ReconcileState};
pub use store::{FileStateStore, MemoryStateStore};
pub use traits::{DnsUpdater, IpSource, StateStore};

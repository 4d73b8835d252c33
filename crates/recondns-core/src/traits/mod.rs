//! Core traits for the reconciliation cycle
//!
//! - [`IpSource`]: one public-IP echo service
//! - [`DnsUpdater`]: apply a new IP at a DNS provider
//! - [`StateStore`]: load/save the persisted reconciliation record

pub mod dns_updater;
pub mod ip_source;
pub mod state_store;

pub use dns_updater::DnsUpdater;
pub use ip_source::IpSource;
pub use state_store::StateStore;

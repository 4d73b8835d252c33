// # DNS Updater Trait
//
// Applies a new target IP to a DNS record via a provider API.
//
// The updater is deliberately narrow: authenticate, target one
// zone + record, set the value. It makes a single synchronous call
// per invocation — success means the provider accepted the change,
// not that propagation completed. Deciding whether an update is
// needed and persisting state are owned by the reconciler; on any
// error here the reconciler leaves local state untouched so the next
// cycle retries.
//
// The provider bundle is opaque to the rest of the system; each
// implementation deserializes the fields it needs and rejects a
// bundle it cannot understand with a configuration error.

use async_trait::async_trait;
use std::net::IpAddr;

use crate::error::Result;
use crate::state::ProviderBundle;

/// Trait for DNS provider backends
#[async_trait]
pub trait DnsUpdater: Send + Sync {
    /// Set the provider's DNS record to `new_ip`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, authentication failure,
    /// a provider-side rejection (non-2xx), or a bundle missing the
    /// fields this provider requires.
    async fn apply_update(&self, provider: &ProviderBundle, new_ip: IpAddr) -> Result<()>;

    /// Provider identifier for logging (e.g. "ovh")
    fn name(&self) -> &'static str;
}

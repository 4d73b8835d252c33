// # IP Source Trait
//
// One public IP-echo service. The resolver owns an ordered list of
// these and tries them in priority order; a source only reports what
// a single service said, it never decides anything.
//
// Implementations live in `recondns-ip-http` (plain-text body and
// JSON body variants). New sources are added by implementing this
// trait; the resolver's control flow never changes.

use async_trait::async_trait;
use std::net::IpAddr;

use crate::error::Result;

/// Trait for public-IP echo sources
///
/// An attempt fails if the network call errors, times out, returns a
/// non-200 status, or the body doesn't parse as an IP address. A
/// failed attempt makes the resolver fall back to the next source;
/// sources must not retry internally.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Query the service once and return the reported public IP
    async fn fetch(&self) -> Result<IpAddr>;

    /// Short source identifier for logging (e.g. "ipify")
    fn name(&self) -> &'static str;
}

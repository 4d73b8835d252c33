//! The persisted reconciliation record.
//!
//! Serialized as one flat JSON object so the on-disk layout matches
//! the record written by the setup step:
//!
//! ```json
//! {
//!   "ip": "203.0.113.1",
//!   "first_time": false,
//!   "ovh_endpoint": "ovh-eu",
//!   "ovh_application_key": "...",
//!   "ovh_application_secret": "...",
//!   "ovh_consumer_key": "...",
//!   "dns_zone_name": "example.org",
//!   "dns_record_id": 123456,
//!   "dns_record_subdomain": "home",
//!   "dns_record_target": "203.0.113.1",
//!   "dns_record_ttl": 600
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Opaque provider-specific settings: credentials, zone name, record
/// id, subdomain, TTL. Owned by the setup step, never interpreted by
/// the reconciler, and re-saved verbatim alongside updated `ip` and
/// `first_run`.
pub type ProviderBundle = serde_json::Map<String, serde_json::Value>;

/// The persisted reconciliation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileState {
    /// Last IP address successfully applied at the provider.
    /// Empty before the first successful update.
    #[serde(default)]
    pub ip: String,

    /// True until the first successful update completes. Forces one
    /// unconditional provider update after setup even when the
    /// resolved IP matches the stored placeholder.
    #[serde(rename = "first_time")]
    pub first_run: bool,

    /// Provider bundle, flattened into the same JSON object
    #[serde(flatten)]
    pub provider: ProviderBundle,
}

impl ReconcileState {
    /// Whether a provider update is required for `current`
    pub fn needs_update(&self, current: IpAddr) -> bool {
        self.first_run || self.ip != current.to_string()
    }

    /// The successor record after `ip` was confirmed by the provider.
    /// `ip` and `first_run` change together; the provider bundle is
    /// carried over untouched.
    pub fn applied(&self, ip: IpAddr) -> Self {
        Self {
            ip: ip.to_string(),
            first_run: false,
            provider: self.provider.clone(),
        }
    }
}

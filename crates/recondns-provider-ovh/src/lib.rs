//! OVH DNS updater.
//!
//! Pushes a resolved public IP into an existing A record through the OVH
//! REST API (`PUT /domain/zone/{zone}/record/{record_id}`). The updater is
//! stateless and single-shot: it makes exactly one HTTP request per cycle
//! and propagates every failure to the reconciler. Persistence decisions
//! belong to the caller.
//!
//! Requests are signed with the OVH first-party application scheme:
//! `X-Ovh-Signature = "$1$" + sha1_hex(secret + "+" + consumer + "+" +
//! METHOD + "+" + URL + "+" + BODY + "+" + timestamp)`.
//!
//! Security: the application secret and consumer key never appear in logs
//! or in `Debug` output.

use std::net::IpAddr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use recondns_core::{DnsUpdater, Error, ProviderBundle, Result};
use serde::Deserialize;
use sha1::{Digest, Sha1};

/// HTTP timeout for OVH API requests (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials and record coordinates, deserialized from the provider
/// section of the persisted record.
///
/// Unknown keys in the record are ignored here; the reconciler carries the
/// full map through to persistence untouched.
#[derive(Deserialize)]
struct OvhConfig {
    ovh_endpoint: String,
    ovh_application_key: String,
    ovh_application_secret: String,
    ovh_consumer_key: String,
    dns_zone_name: String,
    dns_record_id: u64,
    dns_record_subdomain: String,
    dns_record_ttl: u32,
}

impl OvhConfig {
    fn from_bundle(bundle: &ProviderBundle) -> Result<Self> {
        serde_json::from_value(serde_json::Value::Object(bundle.clone()))
            .map_err(|e| Error::config(format!("invalid OVH provider settings: {}", e)))
    }

    /// Resolve the endpoint name to an API base URL.
    ///
    /// Known names map to the official regional gateways. A value that is
    /// already a URL is used as-is, which lets tests point the updater at a
    /// local server.
    fn endpoint_base(&self) -> Result<String> {
        match self.ovh_endpoint.as_str() {
            "ovh-eu" => Ok("https://eu.api.ovh.com/1.0".to_string()),
            "ovh-ca" => Ok("https://ca.api.ovh.com/1.0".to_string()),
            "ovh-us" => Ok("https://api.us.ovhcloud.com/1.0".to_string()),
            other if other.starts_with("http://") || other.starts_with("https://") => {
                Ok(other.trim_end_matches('/').to_string())
            }
            other => Err(Error::config(format!("unknown OVH endpoint: {}", other))),
        }
    }
}

// The application secret and consumer key must never leak through Debug.
impl std::fmt::Debug for OvhConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OvhConfig")
            .field("ovh_endpoint", &self.ovh_endpoint)
            .field("ovh_application_key", &self.ovh_application_key)
            .field("ovh_application_secret", &"<REDACTED>")
            .field("ovh_consumer_key", &"<REDACTED>")
            .field("dns_zone_name", &self.dns_zone_name)
            .field("dns_record_id", &self.dns_record_id)
            .field("dns_record_subdomain", &self.dns_record_subdomain)
            .field("dns_record_ttl", &self.dns_record_ttl)
            .finish()
    }
}

/// Compute the `X-Ovh-Signature` header value for one request.
fn sign(config: &OvhConfig, method: &str, url: &str, body: &str, timestamp: u64) -> String {
    let material = format!(
        "{}+{}+{}+{}+{}+{}",
        config.ovh_application_secret, config.ovh_consumer_key, method, url, body, timestamp
    );
    let digest = Sha1::digest(material.as_bytes());
    let mut signature = String::with_capacity(4 + digest.len() * 2);
    signature.push_str("$1$");
    for byte in digest {
        signature.push_str(&format!("{:02x}", byte));
    }
    signature
}

fn unix_timestamp() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| Error::provider("ovh", format!("system clock before epoch: {}", e)))
}

/// DNS updater backed by the OVH zone record API.
pub struct OvhUpdater {
    client: reqwest::Client,
}

impl OvhUpdater {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for OvhUpdater {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsUpdater for OvhUpdater {
    /// Rewrite the configured A record to point at `new_ip`.
    ///
    /// The record target is always the freshly resolved address, never a
    /// target remembered from an earlier run.
    async fn apply_update(&self, provider: &ProviderBundle, new_ip: IpAddr) -> Result<()> {
        let config = OvhConfig::from_bundle(provider)?;
        let base = config.endpoint_base()?;

        let url = format!(
            "{}/domain/zone/{}/record/{}",
            base, config.dns_zone_name, config.dns_record_id
        );

        // The signature covers the exact body bytes sent, so serialize once
        // and reuse the string for both.
        let body = serde_json::to_string(&serde_json::json!({
            "subDomain": config.dns_record_subdomain,
            "target": new_ip.to_string(),
            "ttl": config.dns_record_ttl,
        }))
        .map_err(|e| Error::provider("ovh", format!("failed to encode request body: {}", e)))?;

        let timestamp = unix_timestamp()?;
        let signature = sign(&config, "PUT", &url, &body, timestamp);

        tracing::debug!(
            "updating OVH record {} in zone {} -> {}",
            config.dns_record_id,
            config.dns_zone_name,
            new_ip
        );

        let response = self
            .client
            .put(&url)
            .header("Content-Type", "application/json")
            .header("X-Ovh-Application", &config.ovh_application_key)
            .header("X-Ovh-Consumer", &config.ovh_consumer_key)
            .header("X-Ovh-Timestamp", timestamp.to_string())
            .header("X-Ovh-Signature", signature)
            .body(body)
            .send()
            .await
            .map_err(|e| Error::provider("ovh", format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error response".to_string());

            return match status.as_u16() {
                401 | 403 => Err(Error::provider(
                    "ovh",
                    format!(
                        "authentication failed: invalid credentials or signature ({}): {}",
                        status, error_text
                    ),
                )),
                404 => Err(Error::provider(
                    "ovh",
                    format!(
                        "record {} not found in zone {} ({})",
                        config.dns_record_id, config.dns_zone_name, status
                    ),
                )),
                429 => Err(Error::provider(
                    "ovh",
                    format!("rate limit exceeded ({})", status),
                )),
                500..=599 => Err(Error::provider(
                    "ovh",
                    format!("server error ({}): {}", status, error_text),
                )),
                _ => Err(Error::provider(
                    "ovh",
                    format!("record update failed ({}): {}", status, error_text),
                )),
            };
        }

        tracing::info!(
            "OVH record {}.{} updated -> {}",
            config.dns_record_subdomain,
            config.dns_zone_name,
            new_ip
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ovh"
    }
}

// # HTTP IP-echo sources
//
// Two `IpSource` implementations over public IP-echo services:
//
// - `PlainTextSource`: the service returns the caller's IP as the raw
//   response body (ipify style)
// - `JsonSource`: the service returns a JSON object with an `ip`
//   field (ipapi style)
//
// Both treat a non-200 status, transport error, timeout, or
// unparsable body as a source failure so the resolver falls back to
// the next entry in the chain. Neither retries on its own.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use recondns_core::error::{Error, Result};
use recondns_core::traits::IpSource;

/// Default plain-text echo endpoint
const DEFAULT_TEXT_URL: &str = "https://api.ipify.org";

/// Default JSON echo endpoint
const DEFAULT_JSON_URL: &str = "https://ipapi.co/json/";

/// Per-request timeout; a stuck echo service must not hang the cycle
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_default()
}

async fn get_ok(client: &reqwest::Client, url: &str, source: &'static str) -> Result<reqwest::Response> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::resolution(format!("{source} request failed: {e}")))?;

    if response.status() != reqwest::StatusCode::OK {
        return Err(Error::resolution(format!(
            "{source} returned HTTP {}",
            response.status()
        )));
    }

    Ok(response)
}

/// IP-echo source returning the IP as a raw text body
pub struct PlainTextSource {
    url: String,
    client: reqwest::Client,
}

impl PlainTextSource {
    /// Create a source against the default ipify endpoint
    pub fn new() -> Self {
        Self::with_url(DEFAULT_TEXT_URL)
    }

    /// Create a source against a specific URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: http_client(),
        }
    }
}

impl Default for PlainTextSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IpSource for PlainTextSource {
    async fn fetch(&self) -> Result<IpAddr> {
        debug!("fetching public IP from {}", self.url);
        let response = get_ok(&self.client, &self.url, self.name()).await?;

        let body = response
            .text()
            .await
            .map_err(|e| Error::resolution(format!("ipify body read failed: {e}")))?;

        body.trim()
            .parse()
            .map_err(|_| Error::resolution(format!("ipify returned a non-IP body: {:?}", body.trim())))
    }

    fn name(&self) -> &'static str {
        "ipify"
    }
}

/// Response shape of JSON echo services: only the `ip` field matters
#[derive(Debug, Deserialize)]
struct JsonEchoBody {
    ip: String,
}

/// IP-echo source returning a JSON body with an `ip` field
pub struct JsonSource {
    url: String,
    client: reqwest::Client,
}

impl JsonSource {
    /// Create a source against the default ipapi endpoint
    pub fn new() -> Self {
        Self::with_url(DEFAULT_JSON_URL)
    }

    /// Create a source against a specific URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: http_client(),
        }
    }
}

impl Default for JsonSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IpSource for JsonSource {
    async fn fetch(&self) -> Result<IpAddr> {
        debug!("fetching public IP from {}", self.url);
        let response = get_ok(&self.client, &self.url, self.name()).await?;

        let body: JsonEchoBody = response
            .json()
            .await
            .map_err(|e| Error::resolution(format!("ipapi body parse failed: {e}")))?;

        body.ip
            .parse()
            .map_err(|_| Error::resolution(format!("ipapi returned a non-IP value: {:?}", body.ip)))
    }

    fn name(&self) -> &'static str {
        "ipapi"
    }
}

/// The default fallback chain: plain-text first, JSON second.
/// URL overrides are for deployments fronting their own echo service
/// (and for tests).
pub fn default_chain(
    text_url: Option<String>,
    json_url: Option<String>,
) -> Vec<Box<dyn IpSource>> {
    let text = match text_url {
        Some(url) => PlainTextSource::with_url(url),
        None => PlainTextSource::new(),
    };
    let json = match json_url {
        Some(url) => JsonSource::with_url(url),
        None => JsonSource::new(),
    };
    vec![Box::new(text), Box::new(json)]
}

//! Public IP resolution over an ordered fallback chain.
//!
//! The resolver tries each configured [`IpSource`] in priority order
//! and returns the first successful answer. There are no retries
//! beyond the chain itself; if every source fails the cycle reports
//! "IP unavailable" and touches nothing.

use std::net::IpAddr;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::traits::IpSource;

/// A resolved public IP plus the source that reported it.
/// The source identity is for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedIp {
    /// The resolved public IP address
    pub ip: IpAddr,
    /// Name of the source that produced it
    pub source: &'static str,
}

/// Ordered fallback chain of IP-echo sources
pub struct IpResolver {
    sources: Vec<Box<dyn IpSource>>,
}

impl IpResolver {
    /// Create a resolver over `sources`, tried in the given order
    pub fn new(sources: Vec<Box<dyn IpSource>>) -> Self {
        Self { sources }
    }

    /// Resolve the current public IP
    ///
    /// Returns the first source that answers. Each failure is logged
    /// and the next source is tried; [`Error::Resolution`] is
    /// returned only when the whole chain is exhausted.
    pub async fn resolve(&self) -> Result<ResolvedIp> {
        if self.sources.is_empty() {
            return Err(Error::resolution("no IP sources configured"));
        }

        let mut failures = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            debug!("querying IP source {}", source.name());
            match source.fetch().await {
                Ok(ip) => {
                    return Ok(ResolvedIp {
                        ip,
                        source: source.name(),
                    });
                }
                Err(e) => {
                    warn!("IP source {} failed: {}", source.name(), e);
                    failures.push(format!("{}: {}", source.name(), e));
                }
            }
        }

        Err(Error::resolution(format!(
            "all {} sources failed ({})",
            self.sources.len(),
            failures.join("; ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSource {
        name: &'static str,
        ip: IpAddr,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn new(name: &'static str, ip: &str) -> Self {
            Self {
                name,
                ip: ip.parse().unwrap(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl IpSource for FixedSource {
        async fn fetch(&self) -> Result<IpAddr> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.ip)
        }

        fn name(&self) -> &'static str {
            self.name
        }
    }

    struct BrokenSource(&'static str);

    #[async_trait]
    impl IpSource for BrokenSource {
        async fn fetch(&self) -> Result<IpAddr> {
            Err(Error::resolution("connection refused"))
        }

        fn name(&self) -> &'static str {
            self.0
        }
    }

    #[tokio::test]
    async fn first_successful_source_wins() {
        let resolver = IpResolver::new(vec![
            Box::new(FixedSource::new("a", "203.0.113.1")),
            Box::new(FixedSource::new("b", "203.0.113.2")),
        ]);

        let resolved = resolver.resolve().await.unwrap();
        assert_eq!(resolved.ip, "203.0.113.1".parse::<IpAddr>().unwrap());
        assert_eq!(resolved.source, "a");
    }

    #[tokio::test]
    async fn falls_back_past_a_failing_source() {
        let resolver = IpResolver::new(vec![
            Box::new(BrokenSource("a")),
            Box::new(FixedSource::new("b", "203.0.113.7")),
        ]);

        let resolved = resolver.resolve().await.unwrap();
        assert_eq!(resolved.ip, "203.0.113.7".parse::<IpAddr>().unwrap());
        assert_eq!(resolved.source, "b");
    }

    #[tokio::test]
    async fn all_sources_failing_is_a_resolution_error() {
        let resolver =
            IpResolver::new(vec![Box::new(BrokenSource("a")), Box::new(BrokenSource("b"))]);

        let err = resolver.resolve().await.unwrap_err();
        match err {
            Error::Resolution(msg) => {
                assert!(msg.contains("a:"), "message should name source a: {msg}");
                assert!(msg.contains("b:"), "message should name source b: {msg}");
            }
            other => panic!("expected a resolution error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_chain_is_a_resolution_error() {
        let resolver = IpResolver::new(Vec::new());
        assert!(matches!(
            resolver.resolve().await,
            Err(Error::Resolution(_))
        ));
    }
}

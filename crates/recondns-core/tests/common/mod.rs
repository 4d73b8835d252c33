//! Test doubles for reconciliation cycle tests.
//!
//! The mocks count their calls through shared atomics so a test can
//! hand one handle to the reconciler and keep another for assertions.

use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use recondns_core::error::{Error, Result};
use recondns_core::state::{ProviderBundle, ReconcileState};
use recondns_core::traits::{DnsUpdater, IpSource, StateStore};

/// A source that always answers with a fixed IP
pub struct StaticIpSource {
    name: &'static str,
    ip: IpAddr,
    fetch_calls: Arc<AtomicUsize>,
}

impl StaticIpSource {
    pub fn new(name: &'static str, ip: &str) -> Self {
        Self {
            name,
            ip: ip.parse().expect("valid test IP"),
            fetch_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fetch_call_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Create a handle that shares counters with an existing source
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            name: other.name,
            ip: other.ip,
            fetch_calls: Arc::clone(&other.fetch_calls),
        }
    }
}

#[async_trait]
impl IpSource for StaticIpSource {
    async fn fetch(&self) -> Result<IpAddr> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// A source whose every fetch fails
pub struct FailingIpSource {
    name: &'static str,
    fetch_calls: Arc<AtomicUsize>,
}

impl FailingIpSource {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fetch_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fetch_call_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            name: other.name,
            fetch_calls: Arc::clone(&other.fetch_calls),
        }
    }
}

#[async_trait]
impl IpSource for FailingIpSource {
    async fn fetch(&self) -> Result<IpAddr> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::resolution(format!("{} unreachable", self.name)))
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// A DNS updater that records calls and can be told to fail
pub struct MockUpdater {
    fail: bool,
    apply_calls: Arc<AtomicUsize>,
    applied: Arc<Mutex<Vec<(ProviderBundle, IpAddr)>>>,
}

impl MockUpdater {
    pub fn new() -> Self {
        Self {
            fail: false,
            apply_calls: Arc::new(AtomicUsize::new(0)),
            applied: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn apply_call_count(&self) -> usize {
        self.apply_calls.load(Ordering::SeqCst)
    }

    pub async fn applied(&self) -> Vec<(ProviderBundle, IpAddr)> {
        self.applied.lock().await.clone()
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            fail: other.fail,
            apply_calls: Arc::clone(&other.apply_calls),
            applied: Arc::clone(&other.applied),
        }
    }
}

#[async_trait]
impl DnsUpdater for MockUpdater {
    async fn apply_update(&self, provider: &ProviderBundle, new_ip: IpAddr) -> Result<()> {
        self.apply_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::provider("mock", "provider rejected the update"));
        }
        self.applied.lock().await.push((provider.clone(), new_ip));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// A state store wrapper that counts calls and can fail saves
pub struct CountingStateStore {
    inner: recondns_core::MemoryStateStore,
    fail_saves: bool,
    load_calls: Arc<AtomicUsize>,
    save_calls: Arc<AtomicUsize>,
}

impl CountingStateStore {
    pub fn with_state(state: ReconcileState) -> Self {
        Self {
            inner: recondns_core::MemoryStateStore::with_state(state),
            fail_saves: false,
            load_calls: Arc::new(AtomicUsize::new(0)),
            save_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn empty() -> Self {
        Self {
            inner: recondns_core::MemoryStateStore::new(),
            fail_saves: false,
            load_calls: Arc::new(AtomicUsize::new(0)),
            save_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing_saves(state: ReconcileState) -> Self {
        Self {
            fail_saves: true,
            ..Self::with_state(state)
        }
    }

    pub fn load_call_count(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn save_call_count(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub async fn current(&self) -> Option<ReconcileState> {
        self.inner.current().await
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            inner: other.inner.clone(),
            fail_saves: other.fail_saves,
            load_calls: Arc::clone(&other.load_calls),
            save_calls: Arc::clone(&other.save_calls),
        }
    }
}

#[async_trait]
impl StateStore for CountingStateStore {
    async fn load(&self) -> Result<ReconcileState> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.load().await
    }

    async fn save(&self, state: &ReconcileState) -> Result<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves {
            return Err(Error::state_io("disk full"));
        }
        self.inner.save(state).await
    }
}

/// A minimal provider bundle resembling the record setup writes
pub fn sample_bundle() -> ProviderBundle {
    let mut bundle = ProviderBundle::new();
    bundle.insert("ovh_endpoint".into(), "ovh-eu".into());
    bundle.insert("ovh_application_key".into(), "ak".into());
    bundle.insert("ovh_application_secret".into(), "as".into());
    bundle.insert("ovh_consumer_key".into(), "ck".into());
    bundle.insert("dns_zone_name".into(), "example.org".into());
    bundle.insert("dns_record_id".into(), 123456.into());
    bundle.insert("dns_record_subdomain".into(), "home".into());
    bundle.insert("dns_record_target".into(), "203.0.113.1".into());
    bundle.insert("dns_record_ttl".into(), 600.into());
    bundle
}

pub fn sample_state(ip: &str, first_run: bool) -> ReconcileState {
    ReconcileState {
        ip: ip.to_string(),
        first_run,
        provider: sample_bundle(),
    }
}

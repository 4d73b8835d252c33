// # recondns - one-shot dynamic DNS reconciliation
//
// This binary is a thin integration layer. It reads configuration from
// environment variables, wires the concrete IP sources, state store, and
// OVH updater into a reconciler, runs a single cycle, and maps the outcome
// to an exit code. All reconciliation logic lives in recondns-core.
//
// ## Configuration
//
// - `RECONDNS_STATE_PATH`: path to the JSON record file (required)
// - `RECONDNS_LOCK_PATH`: cycle lock file (default: state path + ".lock").
//   A crashed run can leave the lock behind; remove it by hand after
//   checking the pid written inside is gone.
// - `RECONDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
// - `RECONDNS_IP_URL_TEXT`: override the plain-text IP echo URL
// - `RECONDNS_IP_URL_JSON`: override the JSON IP echo URL
//
// ## Exit codes
//
// - 0: record updated, or no change needed
// - 1: configuration error, lock held, or unreadable record file
// - 2: record file missing (initial setup required)
// - 3: public IP resolution failed
// - 4: provider update failed
// - 5: update applied but the record file could not be persisted
//
// ## Example
//
// ```bash
// export RECONDNS_STATE_PATH=/var/lib/recondns/record.json
// recondns
// ```

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use recondns_core::{CycleLock, CycleOutcome, FileStateStore, IpResolver, Reconciler};
use recondns_ip_http::default_chain;
use recondns_provider_ovh::OvhUpdater;

/// Exit codes for the classified cycle outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReconExitCode {
    /// Record updated or already current
    Success = 0,
    /// Configuration error, held lock, or unreadable record file
    StartupError = 1,
    /// Record file missing, initial setup required
    SetupRequired = 2,
    /// No IP echo source produced an address
    ResolutionFailed = 3,
    /// Provider rejected or failed the update
    UpdateFailed = 4,
    /// Update applied but persistence failed
    PersistFailed = 5,
}

impl From<ReconExitCode> for ExitCode {
    fn from(code: ReconExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<&CycleOutcome> for ReconExitCode {
    fn from(outcome: &CycleOutcome) -> Self {
        match outcome {
            CycleOutcome::Updated { .. } | CycleOutcome::NoChange { .. } => Self::Success,
            CycleOutcome::LoadFailed { .. } => Self::StartupError,
            CycleOutcome::SetupRequired => Self::SetupRequired,
            CycleOutcome::ResolutionFailed { .. } => Self::ResolutionFailed,
            CycleOutcome::UpdateFailed { .. } => Self::UpdateFailed,
            CycleOutcome::PersistFailed { .. } => Self::PersistFailed,
        }
    }
}

/// Application configuration
struct Config {
    state_path: String,
    lock_path: String,
    log_level: String,
    ip_url_text: Option<String>,
    ip_url_json: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let state_path = env::var("RECONDNS_STATE_PATH").map_err(|_| {
            anyhow::anyhow!(
                "RECONDNS_STATE_PATH is required. \
                Set it via: export RECONDNS_STATE_PATH=/var/lib/recondns/record.json"
            )
        })?;
        let lock_path =
            env::var("RECONDNS_LOCK_PATH").unwrap_or_else(|_| format!("{}.lock", state_path));

        Ok(Self {
            state_path,
            lock_path,
            log_level: env::var("RECONDNS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            ip_url_text: env::var("RECONDNS_IP_URL_TEXT").ok(),
            ip_url_json: env::var("RECONDNS_IP_URL_JSON").ok(),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.state_path.is_empty() {
            anyhow::bail!("RECONDNS_STATE_PATH cannot be empty");
        }

        if self.lock_path.is_empty() {
            anyhow::bail!("RECONDNS_LOCK_PATH cannot be empty");
        }

        if let Some(parent) = std::path::Path::new(&self.state_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            anyhow::bail!(
                "RECONDNS_STATE_PATH parent directory does not exist: {}. \
                Create it first: mkdir -p {}",
                parent.display(),
                parent.display()
            );
        }

        for (name, url) in [
            ("RECONDNS_IP_URL_TEXT", &self.ip_url_text),
            ("RECONDNS_IP_URL_JSON", &self.ip_url_json),
        ] {
            if let Some(url) = url {
                if !url.starts_with("https://") && !url.starts_with("http://") {
                    anyhow::bail!("{} must use HTTP or HTTPS scheme. Got: {}", name, url);
                }
                if url.starts_with("http://") {
                    warn!("{} uses HTTP (not HTTPS); consider using HTTPS", name);
                }
            }
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "RECONDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn tracing_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ReconExitCode::StartupError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return ReconExitCode::StartupError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ReconExitCode::StartupError.into();
    }

    // Hold the lock for the whole cycle so overlapping cron invocations
    // cannot race each other on the record file.
    let _lock = match CycleLock::acquire(&config.lock_path) {
        Ok(lock) => lock,
        Err(e) => {
            error!("Could not acquire cycle lock: {}", e);
            return ReconExitCode::StartupError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ReconExitCode::StartupError.into();
        }
    };

    let outcome = rt.block_on(run_cycle(config));
    report(&outcome);
    ReconExitCode::from(&outcome).into()
}

/// Build the reconciler from the configuration and run one cycle.
async fn run_cycle(config: Config) -> CycleOutcome {
    let store = FileStateStore::new(&config.state_path);
    let resolver = IpResolver::new(default_chain(config.ip_url_text, config.ip_url_json));
    let updater = OvhUpdater::new();

    let reconciler = Reconciler::new(Box::new(store), resolver, Box::new(updater));
    reconciler.run_once().await
}

/// Log the outcome at a level matching its severity.
fn report(outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Updated { ip, source } => {
            info!("record updated to {} (resolved via {})", ip, source);
        }
        CycleOutcome::NoChange { ip } => {
            info!("public IP unchanged ({}), nothing to do", ip);
        }
        CycleOutcome::SetupRequired => {
            error!(
                "record file not found; create it with first_time=true and \
                provider settings before running"
            );
        }
        CycleOutcome::LoadFailed { error } => {
            error!("could not read record file: {}", error);
        }
        CycleOutcome::ResolutionFailed { error } => {
            error!("public IP resolution failed: {}", error);
        }
        CycleOutcome::UpdateFailed { error } => {
            error!("DNS update failed, record file left untouched: {}", error);
        }
        CycleOutcome::PersistFailed { error } => {
            error!(
                "DNS update succeeded but the record file was not persisted; \
                next run will re-apply: {}",
                error
            );
        }
    }
}

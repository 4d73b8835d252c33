//! Error types for the reconciliation cycle.
//!
//! The enum is closed on purpose: every failure a cycle can hit maps
//! to exactly one variant, and the [`Reconciler`](crate::Reconciler)
//! converts each into a cycle outcome instead of letting it escape.

use thiserror::Error;

/// Result type alias for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the reconciliation cycle
#[derive(Error, Debug)]
pub enum Error {
    /// No persisted state record exists; external setup has not run yet.
    /// Distinct from [`Error::StateIo`]: a present-but-unreadable record
    /// is not a setup problem.
    #[error("no persisted state record found; run the setup step first")]
    StateNotFound,

    /// State record could not be read, written, or parsed
    #[error("state store error: {0}")]
    StateIo(String),

    /// Every configured IP-echo source failed
    #[error("unable to determine current public IP: {0}")]
    Resolution(String),

    /// The DNS provider rejected the update or was unreachable
    #[error("provider error ({provider}): {message}")]
    ProviderUpdate {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Provider bundle or CLI configuration is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// Another reconciliation cycle holds the lock
    #[error("cycle lock held: {0}")]
    CycleLocked(String),
}

impl Error {
    /// Create a state I/O error
    pub fn state_io(msg: impl Into<String>) -> Self {
        Self::StateIo(msg.into())
    }

    /// Create a resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a provider update error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderUpdate {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

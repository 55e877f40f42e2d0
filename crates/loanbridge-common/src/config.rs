//! Configuration for the outbound API client.
//!
//! The base address comes from the environment so deployments can point the
//! client at different gateway instances without code changes. Timeouts are
//! explicit configuration inputs rather than whatever the HTTP client would
//! default to.

use std::env;
use std::time::Duration;

/// Environment variable providing the API gateway base address.
pub const BASE_URL_ENV: &str = "LOANBRIDGE_API_BASE_URL";

/// Default connection timeout (5 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default total request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the outbound API client.
///
/// Construct with [`ClientConfig::new`] or [`ClientConfig::from_env`] and
/// refine with the `with_*` builder methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base address of the API gateway, e.g. `https://api.loans.example`.
    ///
    /// May be empty when the environment provides no address; requests will
    /// then fail at send time with a configuration-shaped error rather than
    /// at construction time.
    pub base_url: String,

    /// Connection establishment timeout.
    pub connect_timeout: Duration,

    /// Total request timeout, covering connect, send, and body read.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration with the given base address and default timeouts.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates a configuration from the environment.
    ///
    /// Reads the base address from [`BASE_URL_ENV`], falling back to the
    /// empty string when unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(env::var(BASE_URL_ENV).unwrap_or_default())
    }

    /// Sets the base address.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Sets the total request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

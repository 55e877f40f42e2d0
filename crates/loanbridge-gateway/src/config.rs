//! Gateway configuration.
//!
//! Configuration is loaded from `~/.config/loanbridge/gateway.toml`; a
//! missing file yields the defaults, so the gateway runs out of the box.
//!
//! ## Example Configuration
//!
//! ```toml
//! listen_addr = "127.0.0.1:8787"
//! connect_timeout_secs = 5
//! request_timeout_secs = 30
//! allowed_hosts = ["rates.example", "credit-bureau.example"]
//! ```
//!
//! An empty `allowed_hosts` list preserves the historical open behavior:
//! the proxy forwards to any caller-supplied host.

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};

/// Environment variable overriding the listen address.
pub const LISTEN_ENV: &str = "LOANBRIDGE_LISTEN";

/// Gateway configuration loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Socket address the gateway binds to (default: `127.0.0.1:8787`).
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Connection timeout for outbound proxy calls, in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Total timeout for outbound proxy calls, in seconds (default: 30).
    ///
    /// A hung upstream therefore hangs the inbound call for at most this
    /// long, never indefinitely.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Hosts the proxy may forward to. Empty means any host is allowed.
    #[serde(default)]
    pub allowed_hosts: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            allowed_hosts: Vec::new(),
        }
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1:8787".to_string()
}

const fn default_connect_timeout() -> u64 {
    5
}

const fn default_request_timeout() -> u64 {
    30
}

impl GatewayConfig {
    /// Loads configuration from the default location.
    ///
    /// Reads from `~/.config/loanbridge/gateway.toml` when present,
    /// otherwise starts from defaults. `LOANBRIDGE_LISTEN` overrides the
    /// bind address either way.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config directory cannot be determined
    /// - The file exists but cannot be read or deserialized
    /// - Validation fails
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let mut config = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| {
                GatewayError::Config(format!("Failed to read config file: {e}"))
            })?;
            toml::from_str(&contents)?
        } else {
            Self::default()
        };

        if let Ok(addr) = std::env::var(LISTEN_ENV) {
            config.listen_addr = addr;
        }

        config.validate()?;

        Ok(config)
    }

    /// Returns the default configuration file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                GatewayError::Config("Failed to determine config directory".to_string())
            })?
            .join("loanbridge");

        Ok(config_dir.join("gateway.toml"))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The listen address is not a valid socket address
    /// - The request timeout is zero
    /// - An allow-list entry is empty
    pub fn validate(&self) -> Result<()> {
        if self.listen_addr.parse::<SocketAddr>().is_err() {
            return Err(GatewayError::Config(format!(
                "Invalid listen address '{}'",
                self.listen_addr
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(GatewayError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.allowed_hosts.iter().any(|h| h.trim().is_empty()) {
            return Err(GatewayError::Config(
                "allowed_hosts entries must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether the proxy may forward to `host`.
    ///
    /// An empty allow-list allows every host.
    #[must_use]
    pub fn is_host_allowed(&self, host: &str) -> bool {
        self.allowed_hosts.is_empty()
            || self
                .allowed_hosts
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(host))
    }

    /// Connection timeout as a [`Duration`].
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

//! Loanbridge Gateway
//!
//! Server binary exposing the generic proxy endpoint used by the dashboard
//! to reach third-party services past browser cross-origin restrictions.

use tracing::{error, info, warn};

use loanbridge_gateway::config::GatewayConfig;
use loanbridge_gateway::error::Result;
use loanbridge_gateway::server::Server;

/// Initializes structured logging with tracing.
///
/// Supports two output formats via the `LOANBRIDGE_LOG_FORMAT` environment
/// variable:
/// - `json`: Machine-readable JSON logs
/// - `pretty`: Human-readable formatted logs (default)
///
/// Log level is controlled via the `RUST_LOG` environment variable.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let format = std::env::var("LOANBRIDGE_LOG_FORMAT")
        .unwrap_or_else(|_| "pretty".to_string())
        .to_lowercase();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("loanbridge_gateway=info"));

    match format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .init();
        }
        _ => {
            fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_file(false)
                .with_line_number(false)
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Starting loanbridge gateway");

    let config = match GatewayConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            error!("Expected config at: {:?}", GatewayConfig::config_path());
            return Err(e);
        }
    };

    if config.allowed_hosts.is_empty() {
        warn!("proxy target allow-list is empty; forwarding to any host");
    } else {
        info!(
            "proxy restricted to {} allowed host(s)",
            config.allowed_hosts.len()
        );
    }

    Server::new(config).run().await?;

    info!("Gateway shutdown complete");

    Ok(())
}

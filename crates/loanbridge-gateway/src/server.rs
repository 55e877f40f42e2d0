//! HTTP server lifecycle.

use tokio::net::TcpListener;
use tracing::info;

use crate::config::GatewayConfig;
use crate::error::Result;
use crate::proxy::{self, AppState};

/// The gateway server: binds the configured address and serves the proxy
/// router until shutdown.
#[derive(Debug)]
pub struct Server {
    config: GatewayConfig,
}

impl Server {
    /// Creates a server from a validated configuration.
    #[must_use]
    pub const fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    /// Runs the server until ctrl-c.
    ///
    /// # Errors
    ///
    /// Returns an error if the listen address cannot be bound, the outbound
    /// HTTP client cannot be built, or serving fails.
    pub async fn run(self) -> Result<()> {
        let listen_addr = self.config.listen_addr.clone();
        let state = AppState::new(self.config)?;
        let app = proxy::router(state);

        let listener = TcpListener::bind(&listen_addr).await?;
        info!("listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received ctrl-c, initiating graceful shutdown");
    }
}

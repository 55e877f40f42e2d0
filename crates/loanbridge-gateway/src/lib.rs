//! # loanbridge-gateway
//!
//! HTTP gateway for the Loanbridge dashboard. Exposes the generic proxy
//! endpoint (`GET|POST /api/proxy?url=<target>`) that forwards caller-
//! specified requests to third-party services and relays the upstream
//! status, content type, and raw body verbatim, plus a health route.
//!
//! The proxy forwards no credentials and no caller headers, performs no
//! retries, and holds no state between calls. Outbound timeouts and an
//! optional target-host allow-list are explicit configuration.

pub mod config;
pub mod error;
pub mod proxy;
pub mod server;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use proxy::{AppState, router};
pub use server::Server;

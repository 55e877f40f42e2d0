//! # loanbridge-client
//!
//! Authenticated HTTP client for the Loanbridge API gateway.
//!
//! One [`ApiClient`] is configured at process start with a base address and
//! shared by every call site. A request interceptor attaches the bearer
//! credential read from a [`CredentialStore`](loanbridge_common::CredentialStore)
//! on every call; a response interceptor logs authentication failures before
//! propagating them unchanged. The client performs no retries and no token
//! refresh.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use loanbridge_client::ApiClient;
//! use loanbridge_common::{ClientConfig, TokenFileStore};
//!
//! # async fn example() -> Result<(), loanbridge_client::ClientError> {
//! let config = ClientConfig::from_env();
//! let store = Arc::new(TokenFileStore::new("/var/lib/loanbridge"));
//! let client = ApiClient::new(config, store)?;
//!
//! let loans: Vec<serde_json::Value> = client.get_json("loans").await?;
//! println!("{} loans", loans.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod error;

pub use api::ApiClient;
pub use auth::AuthMiddleware;
pub use error::ClientError;

//! # loanbridge-common
//!
//! Shared types for the Loanbridge boundary layer: client configuration,
//! credential sources, and the transient request/response shapes exchanged
//! between the outbound API client and the proxy gateway.
//!
//! Nothing in this crate touches the network. The [`CredentialStore`] trait
//! is the seam between the API client and whatever mechanism actually holds
//! the bearer credential (a token file, a fixed string in tests, nothing at
//! all for unauthenticated operation).

pub mod config;
pub mod credentials;
pub mod relay;

pub use config::ClientConfig;
pub use credentials::{CredentialStore, NoCredentials, StaticTokenStore, TokenFileStore};
pub use relay::{ErrorBody, RelayedResponse};

//! Error types for the client library.

use thiserror::Error;

/// Errors that can occur when calling the API gateway.
///
/// Failures are always propagated to the caller unchanged; the client never
/// retries or recovers silently, so the UI layer decides how each failure is
/// presented.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Network or HTTP request failure.
    ///
    /// Indicates issues like DNS resolution, connection failures, or socket
    /// errors.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Middleware layer error.
    ///
    /// Errors surfaced by the request/response interceptor pipeline.
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// JSON serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failure (HTTP 401).
    ///
    /// The credential is missing, invalid, or revoked. No automatic retry or
    /// token refresh is performed.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Non-success response from the API.
    ///
    /// Carries the status code and the raw error body text.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code of the failed response.
        status: u16,
        /// Raw response body text.
        message: String,
    },

    /// Client configuration issue.
    ///
    /// Invalid base URL, unbuildable HTTP client, or incompatible settings.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Check if this is an authentication error.
    #[must_use]
    pub const fn is_authentication_error(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// The HTTP status this error was derived from, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication(_) => Some(401),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

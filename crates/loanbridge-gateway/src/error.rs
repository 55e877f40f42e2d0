//! Error types for the gateway.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use loanbridge_common::ErrorBody;

/// Errors that can occur in the gateway.
///
/// Request-scoped variants implement [`IntoResponse`] and surface to the
/// caller as `{"error": "<message>"}` with the matching status code.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The caller omitted the required `url` query parameter.
    #[error("URL parameter is required")]
    MissingUrl,

    /// The target URL could not be parsed.
    #[error("invalid target URL: {0}")]
    InvalidTarget(String),

    /// The target host is not on the configured allow-list.
    #[error("target host not allowed: {0}")]
    ForbiddenTarget(String),

    /// The POST body was not valid JSON.
    #[error("request body must be valid JSON: {0}")]
    InvalidBody(String),

    /// The outbound call to the target failed at the transport level.
    ///
    /// Non-2xx upstream statuses are not upstream errors; they are relayed
    /// as-is. This variant covers DNS failures, refused connections, and
    /// timeouts.
    #[error("{0}")]
    Upstream(String),

    /// I/O error (socket binding, config file access).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using [`GatewayError`].
pub type Result<T> = std::result::Result<T, GatewayError>;

impl GatewayError {
    const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingUrl | Self::InvalidTarget(_) | Self::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::ForbiddenTarget(_) => StatusCode::FORBIDDEN,
            Self::Upstream(_) | Self::Io(_) | Self::Toml(_) | Self::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut message = self.to_string();
        if message.is_empty() {
            message = "Unknown error".to_string();
        }
        (status, Json(ErrorBody::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_missing_url_maps_to_400() {
        assert_eq!(
            GatewayError::MissingUrl.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::MissingUrl.to_string(),
            "URL parameter is required"
        );
    }

    #[test]
    fn test_forbidden_target_maps_to_403() {
        let err = GatewayError::ForbiddenTarget("evil.example".to_string());
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_upstream_maps_to_500_with_bare_message() {
        let err = GatewayError::Upstream("ECONNREFUSED".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "ECONNREFUSED");
    }

    #[tokio::test]
    async fn test_empty_upstream_message_defaults_to_unknown_error() {
        let response = GatewayError::Upstream(String::new()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], br#"{"error":"Unknown error"}"#);
    }
}

//! The generic proxy endpoint.
//!
//! `GET|POST /api/proxy?url=<target>` forwards the caller's request to the
//! caller-supplied URL and relays the upstream's status, content type, and
//! raw body back unchanged. The endpoint exists so the dashboard can reach
//! third-party services that browser cross-origin rules would otherwise
//! block; it forwards no credentials and no caller headers.
//!
//! Each inbound call performs exactly one outbound call and holds no state
//! between calls. Non-2xx upstream statuses are relayed, not treated as
//! errors; only transport failures (DNS, refused connections, timeouts)
//! become a 500.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;
use tracing::{debug, error};

use loanbridge_common::relay::{DEFAULT_CONTENT_TYPE, RelayedResponse};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};

/// Shared per-process state: the outbound HTTP client and the configuration.
///
/// Cloned per request; holds nothing mutable, so concurrent proxy calls are
/// fully independent.
#[derive(Debug, Clone)]
pub struct AppState {
    client: reqwest::Client,
    config: Arc<GatewayConfig>,
}

impl AppState {
    /// Builds the state, constructing the outbound client with the
    /// configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }
}

/// Query parameters accepted by the proxy endpoint.
#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    url: Option<String>,
}

/// Builds the gateway router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/proxy", get(proxy_get).post(proxy_post))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Resolves and authorizes the target URL from the query parameters.
///
/// Returns the raw target string; parsing is only used to extract the host
/// for the allow-list check and to reject unfetchable garbage early.
fn authorize_target(config: &GatewayConfig, params: ProxyParams) -> Result<String> {
    let raw = params.url.ok_or(GatewayError::MissingUrl)?;

    let parsed =
        url::Url::parse(&raw).map_err(|e| GatewayError::InvalidTarget(e.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| GatewayError::InvalidTarget(format!("target URL has no host: {raw}")))?;

    if !config.is_host_allowed(host) {
        return Err(GatewayError::ForbiddenTarget(host.to_string()));
    }

    Ok(raw)
}

async fn proxy_get(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
) -> Result<Response> {
    let target = authorize_target(&state.config, params)?;
    debug!("proxying GET to {target}");

    let response = state
        .client
        .get(&target)
        .header(header::CONTENT_TYPE, "application/json")
        .send()
        .await
        .map_err(|e| upstream_error("GET", &target, &e))?;

    Ok(into_response(relay(response).await?))
}

async fn proxy_post(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
    body: String,
) -> Result<Response> {
    let target = authorize_target(&state.config, params)?;

    // The caller's body is parsed and re-serialized rather than streamed
    // through, so only well-formed JSON reaches the upstream.
    let payload: serde_json::Value =
        serde_json::from_str(&body).map_err(|e| GatewayError::InvalidBody(e.to_string()))?;

    debug!("proxying POST to {target}");

    let response = state
        .client
        .post(&target)
        .json(&payload)
        .send()
        .await
        .map_err(|e| upstream_error("POST", &target, &e))?;

    Ok(into_response(relay(response).await?))
}

fn upstream_error(method: &str, target: &str, err: &reqwest::Error) -> GatewayError {
    error!("proxy {method} to {target} failed: {err}");
    GatewayError::Upstream(err.to_string())
}

/// Captures the upstream response as the relayed triple: original status,
/// original content type (defaulting to `text/plain`), raw body text.
async fn relay(response: reqwest::Response) -> Result<RelayedResponse> {
    let status = response.status().as_u16();

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    let body = response
        .text()
        .await
        .map_err(|e| GatewayError::Upstream(e.to_string()))?;

    Ok(RelayedResponse {
        status,
        content_type,
        body,
    })
}

/// Turns a relayed triple into the response sent back to the caller, with
/// no re-serialization of the body.
fn into_response(relayed: RelayedResponse) -> Response {
    let status = StatusCode::from_u16(relayed.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, relayed.content_type)],
        relayed.body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn params(url: Option<&str>) -> ProxyParams {
        ProxyParams {
            url: url.map(String::from),
        }
    }

    #[test]
    fn test_authorize_target_requires_url() {
        let config = GatewayConfig::default();
        let err = authorize_target(&config, params(None)).unwrap_err();
        assert!(matches!(err, GatewayError::MissingUrl));
    }

    #[test]
    fn test_authorize_target_rejects_unparsable_url() {
        let config = GatewayConfig::default();
        let err = authorize_target(&config, params(Some("not a url"))).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidTarget(_)));
    }

    #[test]
    fn test_authorize_target_enforces_allow_list() {
        let config = GatewayConfig {
            allowed_hosts: vec!["rates.example".to_string()],
            ..GatewayConfig::default()
        };

        assert!(authorize_target(&config, params(Some("https://rates.example/quote"))).is_ok());

        let err =
            authorize_target(&config, params(Some("https://evil.example/quote"))).unwrap_err();
        assert!(matches!(err, GatewayError::ForbiddenTarget(host) if host == "evil.example"));
    }

    #[test]
    fn test_authorize_target_open_by_default() {
        let config = GatewayConfig::default();
        let target = authorize_target(&config, params(Some("https://anywhere.example/x")));
        assert_eq!(target.ok().as_deref(), Some("https://anywhere.example/x"));
    }

    #[tokio::test]
    async fn test_relayed_triple_maps_onto_response_verbatim() {
        let relayed = RelayedResponse {
            status: 404,
            content_type: "text/html".to_string(),
            body: "not here".to_string(),
        };

        let response = into_response(relayed);

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("text/html")
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"not here");
    }
}

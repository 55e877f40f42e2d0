//! Request/response interceptors for the API client.
//!
//! [`AuthMiddleware`] is the only interceptor in the pipeline. Before every
//! request it reads the bearer credential from the configured
//! [`CredentialStore`] and attaches it; after every response it inspects the
//! status so authentication failures are visible in the logs before the
//! caller sees them.

use std::sync::Arc;

use async_trait::async_trait;
use http::Extensions;
use http::header::AUTHORIZATION;
use log::{debug, error, warn};
use reqwest::header::HeaderValue;
use reqwest::{Request, Response, StatusCode};
use reqwest_middleware::{Middleware, Next};
use secrecy::ExposeSecret;

use loanbridge_common::CredentialStore;

/// Attaches the bearer credential and observes response statuses.
///
/// The credential is re-read from the store on every request, so a login or
/// logout between calls takes effect immediately. Attachment never fails: a
/// store without a credential (or a credential that is not a valid header
/// value) downgrades the request to unauthenticated.
#[derive(Clone)]
pub struct AuthMiddleware {
    store: Arc<dyn CredentialStore>,
}

impl AuthMiddleware {
    /// Creates the middleware backed by `store`.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for AuthMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthMiddleware").finish_non_exhaustive()
    }
}

#[async_trait]
impl Middleware for AuthMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        if let Some(token) = self.store.get() {
            match HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    req.headers_mut().insert(AUTHORIZATION, value);
                }
                Err(e) => {
                    warn!("credential is not a valid header value, sending unauthenticated: {e}");
                }
            }
        }

        let result = next.run(req, extensions).await;

        match &result {
            Ok(response) => {
                let status = response.status();
                if status == StatusCode::UNAUTHORIZED {
                    // Hook point for redirect-to-login; for now we only log.
                    warn!("received 401 Unauthorized from {}", response.url());
                } else if !status.is_success() {
                    debug!("request to {} returned status {status}", response.url());
                }
            }
            Err(e) => error!("request failed: {e}"),
        }

        result
    }
}

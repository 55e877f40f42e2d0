//! The outbound API client.
//!
//! One [`ApiClient`] is constructed at startup and handed to every call
//! site; it is cheaply cloneable and safe to share across tasks. There is
//! deliberately no global instance, which keeps tests isolated and makes the
//! credential source an explicit dependency.

use std::sync::Arc;

use log::error;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde::de::DeserializeOwned;

use loanbridge_common::{ClientConfig, CredentialStore};

use crate::auth::AuthMiddleware;
use crate::error::ClientError;

/// Authenticated HTTP client for the API gateway.
///
/// Every request carries `Content-Type: application/json` and, when the
/// [`CredentialStore`] yields one, an `Authorization: Bearer <token>`
/// header. Failures are propagated unchanged: no retries, no backoff, no
/// token refresh.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: ClientWithMiddleware,
    config: Arc<ClientConfig>,
}

impl ApiClient {
    /// Builds a client from a configuration and a credential source.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the underlying HTTP client
    /// cannot be built with the configured timeouts.
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let reqwest_client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let client = reqwest_middleware::ClientBuilder::new(reqwest_client)
            .with(AuthMiddleware::new(store))
            .build();

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// The client's configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Issues a GET request and relays the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent. Non-success statuses
    /// are not an error here; use [`Self::error_for_contract`] or the typed
    /// helpers when a 2xx contract is expected.
    pub async fn get(&self, path: &str) -> Result<Response, ClientError> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Issues a DELETE request and relays the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn delete(&self, path: &str) -> Result<Response, ClientError> {
        Ok(self.client.delete(self.url(path)).send().await?)
    }

    /// Issues a POST request with a JSON body and relays the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, ClientError> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Issues a PUT request with a JSON body and relays the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, ClientError> {
        Ok(self.client.put(self.url(path)).json(body).send().await?)
    }

    /// Issues a GET request and deserializes a 2xx JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Authentication`] on 401, [`ClientError::Api`]
    /// on any other non-success status, and
    /// [`ClientError::Serialization`] if the body does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = Self::error_for_contract(self.get(path).await?).await?;
        Self::decode(response).await
    }

    /// Issues a POST request and deserializes a 2xx JSON response.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::get_json`].
    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = Self::error_for_contract(self.post(path, body).await?).await?;
        Self::decode(response).await
    }

    /// Reads the response body and deserializes it as JSON.
    ///
    /// Decoding goes through the raw text so a body that does not match
    /// `T` surfaces as [`ClientError::Serialization`] rather than a
    /// network-shaped error.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Maps non-success responses to errors, logging them on the way out.
    ///
    /// 401 becomes [`ClientError::Authentication`]; any other non-2xx
    /// becomes [`ClientError::Api`] carrying the raw body text. The error is
    /// always returned to the caller, never swallowed.
    ///
    /// # Errors
    ///
    /// See above; reading the error body can itself fail with a network
    /// error, in which case the body is reported as empty.
    pub async fn error_for_contract(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED {
            error!("authentication failure: {message}");
            return Err(ClientError::Authentication(message));
        }

        error!(
            "API request failed with status {}: {message}",
            status.as_u16()
        );
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Builds the gateway path for proxying a request to `target`.
    ///
    /// The target is percent-encoded into the `url` query parameter of the
    /// generic proxy endpoint.
    #[must_use]
    pub fn proxy_path(target: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("url", target)
            .finish();
        format!("/api/proxy?{query}")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]

    use loanbridge_common::{NoCredentials, StaticTokenStore};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer, store: Arc<dyn CredentialStore>) -> ApiClient {
        ApiClient::new(ClientConfig::new(server.uri()), store).unwrap()
    }

    #[tokio::test]
    async fn test_bearer_credential_attached_when_present() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/loans"))
            .and(header("authorization", "Bearer sekrit-token"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Arc::new(StaticTokenStore::new("sekrit-token")));
        let loans: Vec<serde_json::Value> = client.get_json("loans").await.unwrap();
        assert!(loans.is_empty());
    }

    #[tokio::test]
    async fn test_no_authorization_header_when_credential_absent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/loans"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Arc::new(NoCredentials));
        let response = client.get("loans").await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_401_is_propagated_to_caller() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/loans"))
            .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Arc::new(StaticTokenStore::new("stale")));
        let err = client
            .get_json::<serde_json::Value>("loans")
            .await
            .unwrap_err();

        assert!(err.is_authentication_error());
        match err {
            ClientError::Authentication(message) => assert_eq!(message, "token expired"),
            other => panic!("expected authentication error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_other_failures_carry_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/loans"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Arc::new(NoCredentials));
        let err = client
            .get_json::<serde_json::Value>("loans")
            .await
            .unwrap_err();

        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_post_serializes_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/loans"))
            .and(body_json(serde_json::json!({"amount": 1500})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "loan-1"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Arc::new(StaticTokenStore::new("sekrit")));
        let created: serde_json::Value = client
            .post_json("loans", &serde_json::json!({"amount": 1500}))
            .await
            .unwrap();
        assert_eq!(created["id"], "loan-1");
    }

    #[tokio::test]
    async fn test_non_2xx_passthrough_on_raw_get() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/loans/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Arc::new(NoCredentials));
        // Raw accessors relay the response as-is; only the typed helpers
        // turn statuses into errors.
        let response = client.get("loans/missing").await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_mismatched_body_surfaces_as_serialization_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/loans"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"{"x":1}"#, "application/json"),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Arc::new(NoCredentials));
        let err = client
            .get_json::<Vec<serde_json::Value>>("loans")
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Serialization(_)));
    }

    #[test]
    fn test_proxy_path_encodes_target() {
        assert_eq!(
            ApiClient::proxy_path("https://rates.example/quote?loan=1"),
            "/api/proxy?url=https%3A%2F%2Frates.example%2Fquote%3Floan%3D1"
        );
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let config = ClientConfig::new("http://localhost:9000/");
        let client = ApiClient::new(config, Arc::new(NoCredentials)).unwrap();
        assert_eq!(client.url("/loans"), "http://localhost:9000/loans");
        assert_eq!(client.url("loans"), "http://localhost:9000/loans");
    }
}

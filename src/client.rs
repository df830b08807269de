//! Shared HTTP client construction and request plumbing.
//!
//! All service clients build their `reqwest::Client` here so timeout,
//! user-agent, and compression policy stay consistent across services, and
//! route their requests through [`ServiceClient`] so status translation and
//! body decoding happen in exactly one place.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::ApiError;
use crate::headers::RequestHeaders;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

/// Single crate-wide User-Agent so backend traffic identifies this library.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("publishing-clients/{version}")
}

/// Builds an HTTP client using shared project policy.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] when client construction fails.
pub(crate) fn build_http_client() -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
        .user_agent(default_user_agent())
        .gzip(true)
        .build()
        .map_err(|e| ApiError::invalid_request(format!("HTTP client construction failed: {e}")))
}

/// Per-service request helper: service name, base URL, shared `reqwest`
/// client.
///
/// Cloning is cheap; the inner `reqwest::Client` is reference-counted.
#[derive(Debug, Clone)]
pub(crate) struct ServiceClient {
    service: &'static str,
    base_url: String,
    http: Client,
}

impl ServiceClient {
    /// Creates a service client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when the base URL is not an
    /// absolute `http`/`https` URL or client construction fails.
    pub(crate) fn new(service: &'static str, base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        let parsed = Url::parse(&base_url)
            .map_err(|e| ApiError::invalid_request(format!("invalid base URL {base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::invalid_request(format!(
                "unsupported base URL scheme: {}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            service,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: build_http_client()?,
        })
    }

    pub(crate) fn service(&self) -> &'static str {
        self.service
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Joins a path (leading `/` expected) onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET that decodes a 2xx JSON body into `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        headers: &RequestHeaders,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let uri = self.endpoint(path);
        let body = self.get_bytes_at(&uri, headers, query).await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::decode(&uri, e))
    }

    /// GET that returns the raw 2xx body bytes.
    pub(crate) async fn get_bytes(
        &self,
        path: &str,
        headers: &RequestHeaders,
        query: &[(&str, String)],
    ) -> Result<Vec<u8>, ApiError> {
        let uri = self.endpoint(path);
        self.get_bytes_at(&uri, headers, query).await
    }

    async fn get_bytes_at(
        &self,
        uri: &str,
        headers: &RequestHeaders,
        query: &[(&str, String)],
    ) -> Result<Vec<u8>, ApiError> {
        let mut builder = self.http.get(uri);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        self.read_success(headers.apply(builder), uri).await
    }

    /// Sends a prepared request and returns the 2xx body bytes.
    ///
    /// Non-2xx statuses become [`ApiError::InvalidResponse`] carrying the
    /// status, request URI, and raw body.
    pub(crate) async fn read_success(
        &self,
        builder: RequestBuilder,
        uri: &str,
    ) -> Result<Vec<u8>, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::network(uri, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::network(uri, e))?;

        if !status.is_success() {
            debug!(
                service = self.service,
                status = status.as_u16(),
                uri,
                "service returned error status"
            );
            return Err(ApiError::invalid_response(
                status.as_u16(),
                uri,
                String::from_utf8_lossy(&body).into_owned(),
            ));
        }

        Ok(body.to_vec())
    }

    /// Sends a prepared request expecting a 2xx JSON body decoded into `T`.
    pub(crate) async fn read_success_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        uri: &str,
    ) -> Result<T, ApiError> {
        let body = self.read_success(builder, uri).await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::decode(uri, e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_carries_crate_version() {
        let ua = default_user_agent();
        assert!(ua.starts_with("publishing-clients/"));
        assert!(ua.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_new_rejects_relative_base_url() {
        let result = ServiceClient::new("datasets", "localhost:8080");
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_non_http_scheme() {
        let result = ServiceClient::new("datasets", "ftp://localhost:8080");
        assert!(matches!(result, Err(ApiError::InvalidRequest { .. })));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = ServiceClient::new("datasets", "http://localhost:8080/").unwrap();
        assert_eq!(
            client.endpoint("/datasets"),
            "http://localhost:8080/datasets"
        );
    }

    #[tokio::test]
    async fn test_read_success_translates_error_status() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/datasets"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let client = ServiceClient::new("datasets", server.uri()).unwrap();
        let result = client
            .get_bytes("/datasets", &RequestHeaders::default(), &[])
            .await;

        match result {
            Err(ApiError::InvalidResponse { status, uri, body }) => {
                assert_eq!(status, 503);
                assert!(uri.ends_with("/datasets"));
                assert_eq!(body, "unavailable");
            }
            other => panic!("expected InvalidResponse, got {other:?}"),
        }
    }
}

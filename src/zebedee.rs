//! Client for zebedee, the CMS serving published site content.
//!
//! Content is addressed by site URI via the `/data` endpoint; the payload
//! shape depends on the page type, so [`ZebedeeClient::get_published_data`]
//! returns the raw JSON bytes and leaves decoding to the caller.

use serde::Deserialize;
use tracing::instrument;

use crate::client::ServiceClient;
use crate::error::ApiError;
use crate::headers::RequestHeaders;
use crate::health::{CheckState, Healthcheck, run_check};

/// Title fields of a published page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageTitle {
    /// Page title.
    #[serde(default)]
    pub title: String,
    /// Edition of the page, when it has one.
    #[serde(default)]
    pub edition: Option<String>,
    /// Site URI of the page.
    #[serde(default)]
    pub uri: Option<String>,
}

/// Client for the zebedee content API.
#[derive(Debug, Clone)]
pub struct ZebedeeClient {
    inner: ServiceClient,
}

impl ZebedeeClient {
    /// Creates a zebedee client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when the base URL is invalid or
    /// HTTP client construction fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            inner: ServiceClient::new("zebedee", base_url)?,
        })
    }

    /// Fetches the published content at a site URI as raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    #[instrument(level = "debug", skip(self, headers))]
    pub async fn get_published_data(
        &self,
        headers: &RequestHeaders,
        uri_path: &str,
    ) -> Result<Vec<u8>, ApiError> {
        self.inner
            .get_bytes("/data", headers, &[("uri", uri_path.to_string())])
            .await
    }

    /// Fetches just the title fields of the page at a site URI.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn get_page_title(
        &self,
        headers: &RequestHeaders,
        uri_path: &str,
    ) -> Result<PageTitle, ApiError> {
        self.inner
            .get_json(
                "/data",
                headers,
                &[
                    ("uri", uri_path.to_string()),
                    ("title", "true".to_string()),
                ],
            )
            .await
    }
}

#[async_trait::async_trait]
impl Healthcheck for ZebedeeClient {
    async fn checker(&self, state: &mut CheckState) {
        run_check(&self.inner, state).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn test_get_published_data_returns_raw_bytes() {
        let server = MockServer::start().await;
        let body = r#"{"type":"bulletin","description":{"title":"Inflation"}}"#;
        Mock::given(method("GET"))
            .and(path("/data"))
            .and(query_param("uri", "/economy/inflation"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let client = ZebedeeClient::new(server.uri()).unwrap();
        let bytes = client
            .get_published_data(&RequestHeaders::default(), "/economy/inflation")
            .await
            .unwrap();
        assert_eq!(bytes, body.as_bytes());
    }

    #[tokio::test]
    async fn test_get_page_title_decodes_title_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data"))
            .and(query_param("uri", "/economy/inflation"))
            .and(query_param("title", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"title":"Inflation","uri":"/economy/inflation"}"#,
            ))
            .mount(&server)
            .await;

        let client = ZebedeeClient::new(server.uri()).unwrap();
        let title = client
            .get_page_title(&RequestHeaders::default(), "/economy/inflation")
            .await
            .unwrap();
        assert_eq!(title.title, "Inflation");
        assert_eq!(title.uri.as_deref(), Some("/economy/inflation"));
    }
}

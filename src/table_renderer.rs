//! Client for the table renderer service.
//!
//! The renderer takes a JSON table definition and returns the rendered
//! document in the requested format. Definitions are arbitrary caller JSON,
//! so the client passes a `serde_json::Value` through unchanged and returns
//! the rendered bytes.

use tracing::instrument;

use crate::client::ServiceClient;
use crate::error::ApiError;
use crate::headers::RequestHeaders;
use crate::health::{CheckState, Healthcheck, run_check};

/// Client for the table renderer API.
#[derive(Debug, Clone)]
pub struct TableRendererClient {
    inner: ServiceClient,
}

impl TableRendererClient {
    /// Creates a table renderer client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when the base URL is invalid or
    /// HTTP client construction fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            inner: ServiceClient::new("table-renderer", base_url)?,
        })
    }

    /// Renders a table definition into the requested format (e.g. `html`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    #[instrument(level = "debug", skip(self, headers, definition))]
    pub async fn render_table(
        &self,
        headers: &RequestHeaders,
        format: &str,
        definition: &serde_json::Value,
    ) -> Result<Vec<u8>, ApiError> {
        let uri = self.inner.endpoint(&format!("/render/{format}"));
        let builder = headers
            .apply(self.inner.http().post(&uri))
            .json(definition);
        self.inner.read_success(builder, &uri).await
    }
}

#[async_trait::async_trait]
impl Healthcheck for TableRendererClient {
    async fn checker(&self, state: &mut CheckState) {
        run_check(&self.inner, state).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn test_render_table_posts_definition_and_returns_bytes() {
        let server = MockServer::start().await;
        let definition = json!({"title": "Table 1", "data": [[1, 2], [3, 4]]});
        Mock::given(method("POST"))
            .and(path("/render/html"))
            .and(body_json(&definition))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<table><caption>Table 1</caption></table>"),
            )
            .mount(&server)
            .await;

        let client = TableRendererClient::new(server.uri()).unwrap();
        let rendered = client
            .render_table(&RequestHeaders::default(), "html", &definition)
            .await
            .unwrap();
        assert!(String::from_utf8(rendered).unwrap().starts_with("<table>"));
    }

    #[tokio::test]
    async fn test_render_table_surfaces_renderer_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/render/xlsx"))
            .respond_with(ResponseTemplate::new(400).set_body_string("unknown format"))
            .mount(&server)
            .await;

        let client = TableRendererClient::new(server.uri()).unwrap();
        let error = client
            .render_table(&RequestHeaders::default(), "xlsx", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(error.status(), Some(400));
    }
}

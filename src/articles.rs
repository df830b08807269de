//! Client for the articles service.

use serde::Deserialize;

use crate::client::ServiceClient;
use crate::error::ApiError;
use crate::headers::RequestHeaders;
use crate::health::{CheckState, Healthcheck, run_check};

/// A statistical bulletin as served by the articles API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Bulletin {
    /// Site URI of the bulletin.
    #[serde(default)]
    pub uri: String,
    /// Bulletin title.
    #[serde(default)]
    pub title: String,
    /// Edition, e.g. `march-2024`.
    #[serde(default)]
    pub edition: Option<String>,
    /// Short summary, when set.
    #[serde(default)]
    pub summary: Option<String>,
}

/// Client for the articles API.
#[derive(Debug, Clone)]
pub struct ArticlesClient {
    inner: ServiceClient,
}

impl ArticlesClient {
    /// Creates an articles client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when the base URL is invalid or
    /// HTTP client construction fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            inner: ServiceClient::new("articles-api", base_url)?,
        })
    }

    /// Fetches a legacy bulletin by its site URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn get_bulletin(
        &self,
        headers: &RequestHeaders,
        url: &str,
    ) -> Result<Bulletin, ApiError> {
        self.inner
            .get_json("/articles/legacy", headers, &[("url", url.to_string())])
            .await
    }
}

#[async_trait::async_trait]
impl Healthcheck for ArticlesClient {
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
    async fn test_get_bulletin_decodes_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles/legacy"))
            .and(query_param("url", "/economy/inflation/bulletins/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"uri":"/economy/inflation/bulletins/latest","title":"Inflation","edition":"march-2024"}"#,
            ))
            .mount(&server)
            .await;

        let client = ArticlesClient::new(server.uri()).unwrap();
        let bulletin = client
            .get_bulletin(
                &RequestHeaders::default(),
                "/economy/inflation/bulletins/latest",
            )
            .await
            .unwrap();
        assert_eq!(bulletin.title, "Inflation");
        assert_eq!(bulletin.edition.as_deref(), Some("march-2024"));
    }
}

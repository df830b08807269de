//! Client for the areas service (geographic areas and their relations).

use serde::Deserialize;

use crate::client::ServiceClient;
use crate::error::ApiError;
use crate::headers::RequestHeaders;
use crate::health::{CheckState, Healthcheck, run_check};

/// A geographic area.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Area {
    /// Area code, e.g. `E92000001`.
    pub code: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Area type, e.g. `country`, `region`.
    #[serde(default)]
    pub area_type: Option<String>,
}

/// A related area, as returned by the relations endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AreaRelation {
    /// Code of the related area.
    pub area_code: String,
    /// Name of the related area.
    #[serde(default)]
    pub area_name: Option<String>,
    /// Link to the related area resource.
    #[serde(default)]
    pub href: Option<String>,
}

/// Client for the areas API.
#[derive(Debug, Clone)]
pub struct AreasClient {
    inner: ServiceClient,
}

impl AreasClient {
    /// Creates an areas client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when the base URL is invalid or
    /// HTTP client construction fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            inner: ServiceClient::new("areas-api", base_url)?,
        })
    }

    /// Fetches one area by code.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn get_area(&self, headers: &RequestHeaders, code: &str) -> Result<Area, ApiError> {
        self.inner
            .get_json(&format!("/areas/{code}"), headers, &[])
            .await
    }

    /// Fetches the areas related to one area.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn get_area_relations(
        &self,
        headers: &RequestHeaders,
        code: &str,
    ) -> Result<Vec<AreaRelation>, ApiError> {
        self.inner
            .get_json(&format!("/areas/{code}/relations"), headers, &[])
            .await
    }
}

#[async_trait::async_trait]
impl Healthcheck for AreasClient {
    async fn checker(&self, state: &mut CheckState) {
        run_check(&self.inner, state).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn test_get_area_decodes_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/areas/E92000001"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"code":"E92000001","name":"England","area_type":"country"}"#,
            ))
            .mount(&server)
            .await;

        let client = AreasClient::new(server.uri()).unwrap();
        let area = client
            .get_area(&RequestHeaders::default(), "E92000001")
            .await
            .unwrap();
        assert_eq!(area.name.as_deref(), Some("England"));
        assert_eq!(area.area_type.as_deref(), Some("country"));
    }

    #[tokio::test]
    async fn test_get_area_relations_decodes_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/areas/E92000001/relations"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"area_code":"W92000004","area_name":"Wales","href":"/areas/W92000004"}]"#,
            ))
            .mount(&server)
            .await;

        let client = AreasClient::new(server.uri()).unwrap();
        let relations = client
            .get_area_relations(&RequestHeaders::default(), "E92000001")
            .await
            .unwrap();
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].area_code, "W92000004");
    }
}

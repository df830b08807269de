//! Client for the categories service.

use serde::Deserialize;

use crate::client::ServiceClient;
use crate::error::ApiError;
use crate::headers::RequestHeaders;
use crate::health::{CheckState, Healthcheck, run_check};
use crate::page::Page;

/// A content category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    /// Category code, e.g. `economy`.
    pub code: String,
    /// Display label.
    #[serde(default)]
    pub label: Option<String>,
    /// Longer description, when set.
    #[serde(default)]
    pub description: Option<String>,
}

/// Client for the categories API.
#[derive(Debug, Clone)]
pub struct CategoriesClient {
    inner: ServiceClient,
}

impl CategoriesClient {
    /// Creates a categories client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when the base URL is invalid or
    /// HTTP client construction fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            inner: ServiceClient::new("categories-api", base_url)?,
        })
    }

    /// Fetches one page of categories.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn list_categories(
        &self,
        headers: &RequestHeaders,
        offset: usize,
        limit: usize,
    ) -> Result<Page<Category>, ApiError> {
        self.inner
            .get_json(
                "/categories",
                headers,
                &[
                    ("offset", offset.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await
    }

    /// Fetches one category by code.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn get_category(
        &self,
        headers: &RequestHeaders,
        code: &str,
    ) -> Result<Category, ApiError> {
        self.inner
            .get_json(&format!("/categories/{code}"), headers, &[])
            .await
    }
}

#[async_trait::async_trait]
impl Healthcheck for CategoriesClient {
    async fn checker(&self, state: &mut CheckState) {
        run_check(&self.inner, state).await;
    }
}

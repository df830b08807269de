//! Client for the interactives service (embeddable visualisations).

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::ServiceClient;
use crate::error::ApiError;
use crate::headers::RequestHeaders;
use crate::health::{CheckState, Healthcheck, run_check};
use crate::page::Page;

/// A published or in-progress interactive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Interactive {
    /// Interactive identifier.
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Lifecycle state, e.g. `ArchiveUploaded`, `Published`.
    #[serde(default)]
    pub state: Option<String>,
    /// Whether the interactive is live on the site.
    #[serde(default)]
    pub published: Option<bool>,
    /// Site URL once published.
    #[serde(default)]
    pub url: Option<String>,
}

/// Metadata accompanying an interactive archive upload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InteractiveMetadata {
    /// Display title.
    pub title: String,
    /// Label shown in listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Collection the upload belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
}

/// Client for the interactives API.
#[derive(Debug, Clone)]
pub struct InteractivesClient {
    inner: ServiceClient,
}

impl InteractivesClient {
    /// Creates an interactives client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when the base URL is invalid or
    /// HTTP client construction fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            inner: ServiceClient::new("interactives-api", base_url)?,
        })
    }

    /// Fetches one page of interactives.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn list_interactives(
        &self,
        headers: &RequestHeaders,
        offset: usize,
        limit: usize,
    ) -> Result<Page<Interactive>, ApiError> {
        self.inner
            .get_json(
                "/interactives",
                headers,
                &[
                    ("offset", offset.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await
    }

    /// Fetches one interactive by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn get_interactive(
        &self,
        headers: &RequestHeaders,
        id: &str,
    ) -> Result<Interactive, ApiError> {
        self.inner
            .get_json(&format!("/interactives/{id}"), headers, &[])
            .await
    }

    /// Uploads an interactive archive with its metadata.
    ///
    /// The archive goes as a `attachment` multipart part; the metadata is a
    /// JSON-encoded `update` field alongside it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    #[instrument(level = "debug", skip(self, headers, archive), fields(size = archive.len()))]
    pub async fn upload_interactive(
        &self,
        headers: &RequestHeaders,
        archive_name: &str,
        archive: Vec<u8>,
        metadata: &InteractiveMetadata,
    ) -> Result<Interactive, ApiError> {
        let update = serde_json::to_string(metadata)
            .map_err(|e| ApiError::invalid_request(format!("unencodable metadata: {e}")))?;
        let part = reqwest::multipart::Part::bytes(archive).file_name(archive_name.to_string());
        let form = reqwest::multipart::Form::new()
            .text("update", update)
            .part("attachment", part);

        let uri = self.inner.endpoint("/interactives");
        let builder = headers.apply(self.inner.http().post(&uri)).multipart(form);
        self.inner.read_success_json(builder, &uri).await
    }
}

#[async_trait::async_trait]
impl Healthcheck for InteractivesClient {
    async fn checker(&self, state: &mut CheckState) {
        run_check(&self.inner, state).await;
    }
}

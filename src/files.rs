//! Client for the static files service.
//!
//! Files are addressed by their path within the service. Uploads go through
//! multipart encoding: a `path` field naming the destination and a `file`
//! part carrying the bytes.

use serde::Deserialize;
use tracing::instrument;

use crate::client::ServiceClient;
use crate::error::ApiError;
use crate::headers::RequestHeaders;
use crate::health::{CheckState, Healthcheck, run_check};

/// Metadata held by the files service for one stored file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileMetadata {
    /// Path of the file within the service.
    pub path: String,
    /// Display title, when set.
    #[serde(default)]
    pub title: Option<String>,
    /// Size of the stored file in bytes.
    #[serde(default)]
    pub size_in_bytes: u64,
    /// MIME type recorded at upload.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Lifecycle state, e.g. `UPLOADED`, `PUBLISHED`.
    #[serde(default)]
    pub state: Option<String>,
    /// Entity tag for optimistic concurrency.
    #[serde(default)]
    pub etag: Option<String>,
}

/// Client for the static files service.
#[derive(Debug, Clone)]
pub struct FilesClient {
    inner: ServiceClient,
}

impl FilesClient {
    /// Creates a files service client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when the base URL is invalid or
    /// HTTP client construction fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            inner: ServiceClient::new("files-api", base_url)?,
        })
    }

    /// Fetches the metadata for one stored file.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    #[instrument(level = "debug", skip(self, headers))]
    pub async fn get_file(
        &self,
        headers: &RequestHeaders,
        path: &str,
    ) -> Result<FileMetadata, ApiError> {
        self.inner
            .get_json(&format!("/files/{path}"), headers, &[])
            .await
    }

    /// Uploads a file to the given destination path.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] for an unusable MIME type,
    /// otherwise [`ApiError`] on transport failure or non-2xx status.
    #[instrument(level = "debug", skip(self, headers, bytes), fields(size = bytes.len()))]
    pub async fn upload_file(
        &self,
        headers: &RequestHeaders,
        path: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        let file_name = path.rsplit('/').next().unwrap_or(path).to_string();
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_type)
            .map_err(|e| ApiError::invalid_request(format!("invalid MIME type {mime_type}: {e}")))?;
        let form = reqwest::multipart::Form::new()
            .text("path", path.to_string())
            .part("file", part);

        let uri = self.inner.endpoint("/files");
        let builder = headers.apply(self.inner.http().post(&uri)).multipart(form);
        self.inner.read_success(builder, &uri).await.map(|_| ())
    }
}

#[async_trait::async_trait]
impl Healthcheck for FilesClient {
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
    async fn test_get_file_decodes_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/images/chart.png"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"path":"images/chart.png","size_in_bytes":2048,"mime_type":"image/png","state":"UPLOADED"}"#,
            ))
            .mount(&server)
            .await;

        let client = FilesClient::new(server.uri()).unwrap();
        let metadata = client
            .get_file(&RequestHeaders::default(), "images/chart.png")
            .await
            .unwrap();
        assert_eq!(metadata.path, "images/chart.png");
        assert_eq!(metadata.size_in_bytes, 2048);
        assert_eq!(metadata.state.as_deref(), Some("UPLOADED"));
    }

    #[tokio::test]
    async fn test_upload_file_posts_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = FilesClient::new(server.uri()).unwrap();
        client
            .upload_file(
                &RequestHeaders::default(),
                "images/chart.png",
                "image/png",
                vec![0x89, 0x50, 0x4e, 0x47],
            )
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0]
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(
            content_type.starts_with("multipart/form-data"),
            "expected multipart upload, got {content_type}"
        );
    }

    #[tokio::test]
    async fn test_upload_file_rejects_bad_mime_type() {
        let client = FilesClient::new("http://localhost:9").unwrap();
        let result = client
            .upload_file(&RequestHeaders::default(), "a.bin", "not a mime", vec![])
            .await;
        assert!(matches!(result, Err(ApiError::InvalidRequest { .. })));
    }
}

//! Client for the download service.
//!
//! Bodies are returned as a single byte slice; callers wanting streaming
//! should talk to the service directly.

use tracing::instrument;

use crate::client::ServiceClient;
use crate::error::ApiError;
use crate::headers::RequestHeaders;
use crate::health::{CheckState, Healthcheck, run_check};

/// Client for the download service.
#[derive(Debug, Clone)]
pub struct DownloadClient {
    inner: ServiceClient,
}

impl DownloadClient {
    /// Creates a download service client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when the base URL is invalid or
    /// HTTP client construction fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            inner: ServiceClient::new("download-service", base_url)?,
        })
    }

    /// Downloads the file at the given service path.
    ///
    /// Pre-publish files need the download token set on `headers`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    #[instrument(level = "debug", skip(self, headers))]
    pub async fn download_file(
        &self,
        headers: &RequestHeaders,
        path: &str,
    ) -> Result<Vec<u8>, ApiError> {
        self.inner
            .get_bytes(&format!("/downloads/{path}"), headers, &[])
            .await
    }
}

#[async_trait::async_trait]
impl Healthcheck for DownloadClient {
    async fn checker(&self, state: &mut CheckState) {
        run_check(&self.inner, state).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::headers::DOWNLOAD_TOKEN_HEADER;

    #[tokio::test]
    async fn test_download_file_forwards_download_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/downloads/datasets/cpih01.csv"))
            .and(header(DOWNLOAD_TOKEN_HEADER, "dl-token"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"a,b\n1,2\n".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let headers = RequestHeaders {
            download_token: Some("dl-token".to_string()),
            ..RequestHeaders::default()
        };
        let client = DownloadClient::new(server.uri()).unwrap();
        let bytes = client
            .download_file(&headers, "datasets/cpih01.csv")
            .await
            .unwrap();
        assert_eq!(bytes, b"a,b\n1,2\n");
    }

    #[tokio::test]
    async fn test_download_file_translates_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("not authorised"))
            .mount(&server)
            .await;

        let client = DownloadClient::new(server.uri()).unwrap();
        let error = client
            .download_file(&RequestHeaders::default(), "datasets/secret.csv")
            .await
            .unwrap_err();
        assert_eq!(error.status(), Some(403));
    }
}

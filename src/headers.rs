//! Request-header helpers shared by all service clients.
//!
//! Backend services authenticate requests through a small set of headers.
//! [`RequestHeaders`] carries the optional values a caller has and applies
//! them to an outgoing request in one place, so individual clients never
//! hand-assemble header names.

use reqwest::RequestBuilder;

/// Header carrying the user auth token for user-initiated requests.
pub const USER_AUTH_TOKEN_HEADER: &str = "X-User-Auth-Token";

/// Header carrying the collection the request operates within.
pub const COLLECTION_ID_HEADER: &str = "Collection-Id";

/// Header carrying the token accepted by the download service.
pub const DOWNLOAD_TOKEN_HEADER: &str = "X-Download-Token";

/// Header carrying the caller-assigned request id for tracing.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

const BEARER_PREFIX: &str = "Bearer ";

/// Auth and context headers applied to every outgoing service request.
///
/// All fields are optional; absent values produce no header. The service
/// auth token is sent as `Authorization: Bearer …` and the prefix is added
/// when the caller supplied a bare token.
#[derive(Debug, Clone, Default)]
pub struct RequestHeaders {
    /// Token identifying the end user, forwarded unchanged.
    pub user_auth_token: Option<String>,
    /// Service-to-service token, sent as a bearer Authorization header.
    pub service_auth_token: Option<String>,
    /// Collection the request operates within.
    pub collection_id: Option<String>,
    /// Token accepted by the download service for pre-publish access.
    pub download_token: Option<String>,
    /// Caller-assigned request id, forwarded for cross-service tracing.
    pub request_id: Option<String>,
}

impl RequestHeaders {
    /// Applies the populated headers to an outgoing request.
    #[must_use]
    pub fn apply(&self, mut builder: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.user_auth_token {
            builder = builder.header(USER_AUTH_TOKEN_HEADER, token);
        }
        if let Some(token) = &self.service_auth_token {
            builder = builder.bearer_auth(strip_bearer(token));
        }
        if let Some(id) = &self.collection_id {
            builder = builder.header(COLLECTION_ID_HEADER, id);
        }
        if let Some(token) = &self.download_token {
            builder = builder.header(DOWNLOAD_TOKEN_HEADER, token);
        }
        if let Some(id) = &self.request_id {
            builder = builder.header(REQUEST_ID_HEADER, id);
        }
        builder
    }
}

/// Normalizes a service token so a caller-supplied `Bearer ` prefix is not
/// doubled by `bearer_auth`.
fn strip_bearer(token: &str) -> &str {
    token.strip_prefix(BEARER_PREFIX).unwrap_or(token)
}

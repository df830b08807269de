//! Shared error type for all service clients.
//!
//! Every client in this crate reports failures through [`ApiError`], so
//! callers composing several clients handle one error surface. Variants
//! carry the request URI and, for non-2xx responses, the raw body for
//! diagnostics.

use thiserror::Error;

/// Errors returned by service client operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level error (DNS resolution, connection refused, TLS errors,
    /// timeouts enforced by the transport).
    #[error("network error calling {uri}: {source}")]
    Network {
        /// The request URI that failed.
        uri: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status.
    #[error("unexpected response from {uri}: HTTP {status}, body: {body}")]
    InvalidResponse {
        /// The HTTP status code returned.
        status: u16,
        /// The request URI.
        uri: String,
        /// Raw response body, for diagnostics.
        body: String,
    },

    /// A 2xx response body could not be decoded into the expected type.
    #[error("failed to decode response from {uri}: {source}")]
    Decode {
        /// The request URI.
        uri: String,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The request could not be built (bad base URL, malformed input).
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// Human-readable description of what was wrong.
        reason: String,
    },
}

impl ApiError {
    /// Creates a network error from a reqwest error.
    pub fn network(uri: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            uri: uri.into(),
            source,
        }
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(status: u16, uri: impl Into<String>, body: impl Into<String>) -> Self {
        Self::InvalidResponse {
            status,
            uri: uri.into(),
            body: body.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(uri: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            uri: uri.into(),
            source,
        }
    }

    /// Creates an invalid-request error.
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Returns the HTTP status code for invalid-response errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// Note on From trait implementations:
// We intentionally do NOT implement `From<reqwest::Error>` or
// `From<serde_json::Error>` because the variants require the request URI,
// which the source errors don't carry. The helper constructors are the
// supported construction path.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_response_display() {
        let error = ApiError::invalid_response(500, "http://localhost/datasets", "gone wrong");
        let msg = error.to_string();
        assert!(msg.contains("500"), "Expected status in: {msg}");
        assert!(
            msg.contains("http://localhost/datasets"),
            "Expected URI in: {msg}"
        );
        assert!(msg.contains("gone wrong"), "Expected body in: {msg}");
    }

    #[test]
    fn test_invalid_request_display() {
        let error = ApiError::invalid_request("base URL is not absolute");
        assert!(error.to_string().contains("base URL is not absolute"));
    }

    #[test]
    fn test_status_accessor() {
        let error = ApiError::invalid_response(429, "http://localhost/health", "");
        assert_eq!(error.status(), Some(429));

        let error = ApiError::invalid_request("nope");
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_decode_display_carries_uri() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ApiError::decode("http://localhost/datasets/cpih", source);
        let msg = error.to_string();
        assert!(msg.contains("decode"), "Expected decode in: {msg}");
        assert!(
            msg.contains("http://localhost/datasets/cpih"),
            "Expected URI in: {msg}"
        );
    }
}

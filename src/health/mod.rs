//! Health-check wrapper shared by every service client.
//!
//! Each client exposes a [`Healthcheck`] implementation that probes the
//! service's `/health` endpoint (falling back to the legacy `/healthcheck`
//! path on 404) and folds the outcome into a caller-owned [`CheckState`].
//! The mapping is fixed: 200 is healthy, 429 is a warning (the service is up
//! but shedding load), anything else including a transport failure is
//! critical.

use std::time::SystemTime;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::client::ServiceClient;

const HEALTH_ENDPOINT: &str = "/health";
const LEGACY_HEALTH_ENDPOINT: &str = "/healthcheck";

/// Three-level health status reported for a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// The service answered 200.
    Ok,
    /// The service answered 429; it is up but rate-limiting callers.
    Warning,
    /// Any other response, or no response at all.
    Critical,
}

/// Mutable health state for one service, updated by [`Healthcheck::checker`].
#[derive(Debug, Clone)]
pub struct CheckState {
    /// Name of the service this state tracks.
    pub name: String,
    /// Status of the most recent check.
    pub status: HealthStatus,
    /// HTTP status code of the most recent check, when a response arrived.
    pub status_code: Option<u16>,
    /// Human-readable outcome of the most recent check.
    pub message: String,
    /// When the most recent check ran.
    pub last_checked: Option<SystemTime>,
    /// When a check last succeeded.
    pub last_success: Option<SystemTime>,
    /// When a check last found the service critical.
    pub last_failure: Option<SystemTime>,
}

impl CheckState {
    /// Creates state for the named service, critical until first checked.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Critical,
            status_code: None,
            message: String::new(),
            last_checked: None,
            last_success: None,
            last_failure: None,
        }
    }

    fn update(&mut self, status: HealthStatus, status_code: Option<u16>, message: String) {
        let now = SystemTime::now();
        self.status = status;
        self.status_code = status_code;
        self.message = message;
        self.last_checked = Some(now);
        match status {
            HealthStatus::Ok => self.last_success = Some(now),
            HealthStatus::Critical => self.last_failure = Some(now),
            HealthStatus::Warning => {}
        }
    }
}

/// Health probe exposed by every service client.
#[async_trait]
pub trait Healthcheck {
    /// Probes the service once and folds the outcome into `state`.
    async fn checker(&self, state: &mut CheckState);
}

/// Shared probe implementation used by all clients.
pub(crate) async fn run_check(client: &ServiceClient, state: &mut CheckState) {
    let uri = client.endpoint(HEALTH_ENDPOINT);
    let status = match probe(client, &uri).await {
        Ok(404) => {
            // Older services only serve the legacy endpoint.
            let legacy = client.endpoint(LEGACY_HEALTH_ENDPOINT);
            debug!(service = client.service(), uri = %legacy, "health endpoint missing, trying legacy path");
            probe(client, &legacy).await
        }
        other => other,
    };

    match status {
        Ok(code) => {
            let health = classify(code);
            if health != HealthStatus::Ok {
                warn!(
                    service = client.service(),
                    status_code = code,
                    "health check degraded"
                );
            }
            state.update(health, Some(code), status_message(client.service(), code));
        }
        Err(e) => {
            warn!(service = client.service(), error = %e, "health check request failed");
            state.update(
                HealthStatus::Critical,
                None,
                format!("{} health request failed: {e}", client.service()),
            );
        }
    }
}

async fn probe(client: &ServiceClient, uri: &str) -> Result<u16, reqwest::Error> {
    let response = client.http().get(uri).send().await?;
    Ok(response.status().as_u16())
}

fn classify(status_code: u16) -> HealthStatus {
    match status_code {
        200 => HealthStatus::Ok,
        429 => HealthStatus::Warning,
        _ => HealthStatus::Critical,
    }
}

fn status_message(service: &str, status_code: u16) -> String {
    match classify(status_code) {
        HealthStatus::Ok => format!("{service} is ok"),
        HealthStatus::Warning => format!("{service} is rate limiting requests"),
        HealthStatus::Critical => format!("{service} returned HTTP {status_code}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn checked_state(server: &MockServer) -> CheckState {
        let client = ServiceClient::new("datasets", server.uri()).unwrap();
        let mut state = CheckState::new("datasets");
        run_check(&client, &mut state).await;
        state
    }

    #[tokio::test]
    async fn test_healthy_service_reports_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let state = checked_state(&server).await;
        assert_eq!(state.status, HealthStatus::Ok);
        assert_eq!(state.status_code, Some(200));
        assert!(state.last_success.is_some());
        assert!(state.last_failure.is_none());
        assert_eq!(state.message, "datasets is ok");
    }

    #[tokio::test]
    async fn test_rate_limited_service_reports_warning() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let state = checked_state(&server).await;
        assert_eq!(state.status, HealthStatus::Warning);
        assert_eq!(state.status_code, Some(429));
        assert!(state.last_success.is_none());
    }

    #[tokio::test]
    async fn test_server_error_reports_critical() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let state = checked_state(&server).await;
        assert_eq!(state.status, HealthStatus::Critical);
        assert_eq!(state.status_code, Some(500));
        assert!(state.last_failure.is_some());
    }

    #[tokio::test]
    async fn test_missing_health_endpoint_falls_back_to_legacy_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/healthcheck"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let state = checked_state(&server).await;
        assert_eq!(state.status, HealthStatus::Ok);
        assert_eq!(state.status_code, Some(200));
    }

    #[tokio::test]
    async fn test_legacy_endpoint_also_missing_is_critical() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let state = checked_state(&server).await;
        assert_eq!(state.status, HealthStatus::Critical);
        assert_eq!(state.status_code, Some(404));
    }

    #[test]
    fn test_new_state_is_critical_until_checked() {
        let state = CheckState::new("files");
        assert_eq!(state.status, HealthStatus::Critical);
        assert!(state.last_checked.is_none());
    }
}

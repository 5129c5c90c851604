// src/probe/prober.rs
use crate::client::ApiClient;
use crate::probe::ConnectivityState;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// The status string the health endpoint reports when everything is fine.
/// Compared exactly; no trimming or case-folding.
const HEALTHY_STATUS: &str = "ok";

/// Body of `GET /api/health`. A missing `status` field decodes to the
/// empty string and therefore counts as not connected.
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
}

/// Map a health answer to a display state.
pub fn state_from_health(health: &HealthResponse) -> ConnectivityState {
    if health.status == HEALTHY_STATUS {
        ConnectivityState::Connected
    } else {
        ConnectivityState::Disconnected
    }
}

#[derive(Debug)]
pub struct ProbeReport {
    pub state: ConnectivityState,
    pub response_time_ms: u64,
    pub checked_at: DateTime<Utc>,
}

/// One-shot connectivity check against the health endpoint.
///
/// The state is written once, when the single request resolves, and only
/// read afterwards. Re-running an already resolved probe performs no
/// further network calls.
pub struct ConnectivityProbe {
    client: ApiClient,
    health_path: String,
    state: RwLock<ConnectivityState>,
}

impl ConnectivityProbe {
    pub fn new(client: ApiClient, health_path: impl Into<String>) -> Self {
        Self {
            client,
            health_path: health_path.into(),
            state: RwLock::new(ConnectivityState::Loading),
        }
    }

    pub async fn state(&self) -> ConnectivityState {
        *self.state.read().await
    }

    /// Issue the health request and settle the state.
    ///
    /// Every failure, transport-level or server-reported, collapses to
    /// `Disconnected`; the reason is logged but does not reach the state.
    pub async fn run(&self) -> ProbeReport {
        let current = *self.state.read().await;
        if current.is_terminal() {
            debug!(state = %current, "probe already resolved");
            return ProbeReport {
                state: current,
                response_time_ms: 0,
                checked_at: Utc::now(),
            };
        }

        let start = Instant::now();
        let outcome = self.client.get::<HealthResponse>(&self.health_path).await;
        let response_time_ms = start.elapsed().as_millis() as u64;

        let state = match outcome {
            Ok(health) => {
                debug!(status = %health.status, "health endpoint answered");
                state_from_health(&health)
            }
            Err(error) => {
                warn!(%error, "health probe failed");
                ConnectivityState::Disconnected
            }
        };

        *self.state.write().await = state;

        match state {
            ConnectivityState::Connected => {
                info!(response_time_ms, "backend connected");
            }
            _ => {
                warn!(response_time_ms, "backend unreachable");
            }
        }

        ProbeReport {
            state,
            response_time_ms,
            checked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use proptest::prelude::*;

    fn probe_for(base_url: &str) -> ConnectivityProbe {
        let client = ApiClient::new(ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
        .unwrap();
        ConnectivityProbe::new(client, "/api/health")
    }

    fn health(status: &str) -> HealthResponse {
        HealthResponse {
            status: status.to_string(),
        }
    }

    #[test]
    fn ok_status_maps_to_connected() {
        assert_eq!(state_from_health(&health("ok")), ConnectivityState::Connected);
    }

    #[test]
    fn comparison_is_exact() {
        assert_eq!(
            state_from_health(&health("OK")),
            ConnectivityState::Disconnected
        );
        assert_eq!(
            state_from_health(&health(" ok ")),
            ConnectivityState::Disconnected
        );
        assert_eq!(state_from_health(&health("")), ConnectivityState::Disconnected);
    }

    proptest! {
        #[test]
        fn any_other_status_maps_to_disconnected(status in "\\PC*") {
            prop_assume!(status != "ok");
            prop_assert_eq!(
                state_from_health(&health(&status)),
                ConnectivityState::Disconnected
            );
        }
    }

    #[tokio::test]
    async fn starts_loading_and_connects_on_ok() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/health")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"ok"}"#)
            .create_async()
            .await;

        let probe = probe_for(&server.url());
        assert_eq!(probe.state().await, ConnectivityState::Loading);

        let report = probe.run().await;
        assert_eq!(report.state, ConnectivityState::Connected);
        assert_eq!(probe.state().await, ConnectivityState::Connected);
    }

    #[tokio::test]
    async fn degraded_status_disconnects() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/health")
            .with_status(200)
            .with_body(r#"{"status":"degraded"}"#)
            .create_async()
            .await;

        let probe = probe_for(&server.url());
        assert_eq!(probe.run().await.state, ConnectivityState::Disconnected);
    }

    #[tokio::test]
    async fn missing_status_field_disconnects() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/health")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let probe = probe_for(&server.url());
        assert_eq!(probe.run().await.state, ConnectivityState::Disconnected);
    }

    #[tokio::test]
    async fn server_failure_disconnects_regardless_of_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/health")
            .with_status(503)
            .with_body(r#"{"detail":"db down"}"#)
            .create_async()
            .await;

        let probe = probe_for(&server.url());
        assert_eq!(probe.run().await.state, ConnectivityState::Disconnected);
    }

    #[tokio::test]
    async fn transport_failure_disconnects() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let probe = probe_for(&format!("http://{addr}"));
        assert_eq!(probe.run().await.state, ConnectivityState::Disconnected);
    }

    #[tokio::test]
    async fn resolved_probe_does_not_request_again() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/health")
            .with_status(200)
            .with_body(r#"{"status":"ok"}"#)
            .expect(1)
            .create_async()
            .await;

        let probe = probe_for(&server.url());
        assert_eq!(probe.run().await.state, ConnectivityState::Connected);
        assert_eq!(probe.run().await.state, ConnectivityState::Connected);

        mock.assert_async().await;
    }
}

//! Anonymous run reporting for the vanity generator.
//!
//! A payload carries only the prefix length, elapsed time, core count and
//! attempt count of a finished search. It never contains the prefix itself,
//! the generated address, or any key material.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;

pub const DEFAULT_ENDPOINT: &str = "https://worker.stormycloud.org/submit";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetryPayload {
    pub prefix_length: u32,
    pub duration_seconds: f64,
    pub cores_used: u32,
    pub attempts: u64,
}

impl TelemetryPayload {
    pub fn new(prefix_length: u32, elapsed: Duration, cores_used: u32, attempts: u64) -> Self {
        Self {
            prefix_length,
            duration_seconds: elapsed.as_secs_f64(),
            cores_used,
            attempts,
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("send telemetry: {0}")]
    Request(#[from] reqwest::Error),
    #[error("telemetry endpoint answered {0}")]
    Status(StatusCode),
}

#[derive(Clone)]
pub struct TelemetryReporter {
    client: Client,
    endpoint: String,
}

impl TelemetryReporter {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ReportError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ReportError::Client)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn with_default_endpoint() -> Result<Self, ReportError> {
        Self::new(DEFAULT_ENDPOINT)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One POST, no retries. Any non-2xx answer is an error.
    pub async fn send(&self, payload: &TelemetryPayload) -> Result<(), ReportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Status(status));
        }
        tracing::debug!(status = status.as_u16(), "telemetry submitted");
        Ok(())
    }

    /// Sends in the background and discards the outcome, so reporting can
    /// never fail or stall a run. Must be called inside a tokio runtime.
    pub fn submit(&self, payload: TelemetryPayload) -> JoinHandle<()> {
        let reporter = self.clone();
        tokio::spawn(async move {
            if let Err(err) = reporter.send(&payload).await {
                tracing::debug!(error = %err, "telemetry dropped");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode as HttpStatus, routing::post, Json, Router};
    use serde_json::{json, Value};
    use tokio::{net::TcpListener, sync::Mutex};

    use super::*;

    type Received = Arc<Mutex<Vec<Value>>>;

    async fn record(State(received): State<Received>, Json(body): Json<Value>) -> Json<Value> {
        received.lock().await.push(body);
        Json(json!({ "ok": true }))
    }

    async fn reject() -> (HttpStatus, &'static str) {
        (HttpStatus::BAD_REQUEST, "Invalid prefix_length")
    }

    async fn spawn_server(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/submit")
    }

    fn sample() -> TelemetryPayload {
        TelemetryPayload::new(6, Duration::from_millis(5500), 8, 1_234_567)
    }

    #[test]
    fn payload_uses_only_the_four_fields() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "prefix_length": 6,
                "duration_seconds": 5.5,
                "cores_used": 8,
                "attempts": 1_234_567,
            })
        );
    }

    #[test]
    fn default_endpoint_targets_submit() {
        let reporter = TelemetryReporter::with_default_endpoint().unwrap();
        assert_eq!(reporter.endpoint(), DEFAULT_ENDPOINT);
        assert!(DEFAULT_ENDPOINT.ends_with("/submit"));
    }

    #[tokio::test]
    async fn send_posts_json_payload() {
        let received: Received = Arc::default();
        let router = Router::new()
            .route("/submit", post(record))
            .with_state(received.clone());
        let endpoint = spawn_server(router).await;

        let reporter = TelemetryReporter::new(endpoint).unwrap();
        reporter.send(&sample()).await.unwrap();

        let received = received.lock().await;
        assert_eq!(received.len(), 1);
        assert_eq!(received[0]["prefix_length"], 6);
        assert_eq!(received[0]["attempts"], 1_234_567);
    }

    #[tokio::test]
    async fn send_surfaces_rejections() {
        let endpoint = spawn_server(Router::new().route("/submit", post(reject))).await;

        let reporter = TelemetryReporter::new(endpoint).unwrap();
        let err = reporter.send(&sample()).await.unwrap_err();
        assert!(matches!(err, ReportError::Status(status) if status == StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn submit_swallows_connection_errors() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let reporter = TelemetryReporter::new(format!("http://{addr}/submit")).unwrap();
        reporter.submit(sample()).await.unwrap();
    }

    #[tokio::test]
    async fn submit_delivers_in_background() {
        let received: Received = Arc::default();
        let router = Router::new()
            .route("/submit", post(record))
            .with_state(received.clone());
        let endpoint = spawn_server(router).await;

        let reporter = TelemetryReporter::new(endpoint).unwrap();
        reporter.submit(sample()).await.unwrap();
        assert_eq!(received.lock().await.len(), 1);
    }
}

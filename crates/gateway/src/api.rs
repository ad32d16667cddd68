//! REST implementation of the access-log service contract.
//!
//! Wraps the backend HTTP endpoints (scan submission, clarification,
//! log retrieval, control flag) using [`reqwest`]. Every request is
//! bounded by a client-side timeout and carries a cache-busting token.

use std::time::Duration;

use serde_json::json;

use portico_core::{
    AccessLogEntry, ClarificationDecision, EntityType, ScanOutcome, ScanPayload, ToggleState,
};

use crate::contract::AccessGateway;
use crate::wire::{ClarifiedResponse, LogEntryWire, PorticoResponse};

/// Default bound on every outbound call. A call past this is surfaced
/// as a transport failure, never left pending indefinitely.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the access-log backend.
pub struct AccessApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the gateway layer.
///
/// These are never swallowed here; the orchestrator maps them onto
/// operator-facing failure feedback.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (timeout, network unreachable,
    /// DNS, TLS).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response body did not match the expected shape.
    #[error("Malformed response body: {0}")]
    Decode(String),
}

impl AccessApi {
    /// Create a client with the default 30-second request timeout.
    ///
    /// * `base_url` - backend base URL, e.g. `http://localhost:8080`.
    pub fn new(base_url: String) -> Result<Self, GatewayError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(base_url: String, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Backend base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL with the cache-busting token appended.
    fn url(&self, path: &str) -> String {
        format!("{}{}?_cb={}", self.base_url, path, uuid::Uuid::new_v4())
    }

    /// Build a URL with an extra query parameter plus the token.
    fn url_with(&self, path: &str, key: &str, value: &str) -> String {
        format!(
            "{}{}?{}={}&_cb={}",
            self.base_url,
            path,
            key,
            value,
            uuid::Uuid::new_v4()
        )
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`GatewayError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = %status, "Backend returned error status");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    ///
    /// `204 No Content` is success on every endpoint: it yields the
    /// type's default value instead of attempting to decode an empty
    /// body.
    async fn parse_response<T>(response: reqwest::Response) -> Result<T, GatewayError>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let response = Self::ensure_success(response).await?;
        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(T::default());
        }
        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

impl AccessGateway for AccessApi {
    /// Submit a scan: `POST /access/portico`.
    ///
    /// A `204 No Content` response is treated as success with an empty
    /// payload.
    async fn log_portico(&self, identifier: &str) -> Result<ScanOutcome, GatewayError> {
        let response = self
            .client
            .post(self.url("/access/portico"))
            .json(&json!({ "id": identifier }))
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(ScanOutcome::Success(ScanPayload::default()));
        }

        let wire: PorticoResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(wire.into_outcome())
    }

    /// Submit a clarification decision: `POST /access/clarified`.
    async fn log_clarified(
        &self,
        decision: &ClarificationDecision,
    ) -> Result<ScanPayload, GatewayError> {
        let response = self
            .client
            .post(self.url("/access/clarified"))
            .json(decision)
            .send()
            .await?;

        let wire: ClarifiedResponse = Self::parse_response(response).await?;
        Ok(wire.into_payload())
    }

    /// Fetch one entity type's logs: `GET /access/logs?target_type=<type>`.
    async fn fetch_logs(&self, target: EntityType) -> Result<Vec<AccessLogEntry>, GatewayError> {
        let response = self
            .client
            .get(self.url_with("/access/logs", "target_type", target.as_str()))
            .send()
            .await?;

        let wire: Vec<LogEntryWire> = Self::parse_response(response).await?;
        Ok(wire.into_iter().map(|e| e.into_entry(target)).collect())
    }

    /// Read the control flag: `GET /control-status`.
    async fn control_status(&self) -> Result<ToggleState, GatewayError> {
        let response = self.client.get(self.url("/control-status")).send().await?;
        Self::parse_response(response).await
    }

    /// Write the control flag: `POST /control-status`.
    async fn set_control_status(&self, enabled: bool) -> Result<ToggleState, GatewayError> {
        let response = self
            .client
            .post(self.url("/control-status"))
            .json(&json!({ "enabled": enabled }))
            .send()
            .await?;

        Self::parse_response(response).await
    }
}

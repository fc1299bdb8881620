//! HTTP client for the remote delivery service.

use std::time::Duration;

use serde_json::Value;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{ComposeError, Result};
use crate::model::payload::Payload;

/// Path of the send endpoint, appended to the base URL.
pub const SEND_PATH: &str = "/api/email/send";

/// Posts assembled payloads to `<base-url>/api/email/send`.
pub struct TransmissionClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl TransmissionClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ComposeError::Config(format!("HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    /// Build from configuration, honouring an optional base URL override.
    pub fn from_config(config: &Config, base_url_override: Option<&str>) -> Result<Self> {
        Self::new(
            config.base_url(base_url_override),
            Duration::from_secs(config.transport.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> String {
        format!("{}{SEND_PATH}", self.base_url)
    }

    /// Send a payload and return the service's response body.
    ///
    /// A non-JSON success body is returned as a JSON string; an empty one as
    /// `null`.
    pub async fn send(&self, payload: &Payload) -> Result<Value> {
        let url = self.endpoint();
        info!(url = %url, txn = %payload.txn_ref_no, "Sending email request");

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = server_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
            });
            error!(status = status.as_u16(), message = %message, "Delivery service rejected request");
            return Err(ComposeError::Transmission {
                status: Some(status.as_u16()),
                message,
            });
        }

        info!(status = status.as_u16(), txn = %payload.txn_ref_no, "Email request accepted");
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }

    fn transport_error(&self, e: reqwest::Error) -> ComposeError {
        let message = if e.is_timeout() {
            format!("request timed out after {}s", self.timeout.as_secs())
        } else {
            e.to_string()
        };
        error!(error = %e, "Transport error");
        ComposeError::Transmission {
            status: e.status().map(|s| s.as_u16()),
            message,
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Prefers a string `message` field, then `error`, then a short plain-text body.
fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(json) => ["message", "error"]
            .iter()
            .find_map(|key| json.get(key).and_then(Value::as_str))
            .map(str::to_string),
        Err(_) if trimmed.len() <= 200 => Some(trimmed.to_string()),
        Err(_) => None,
    }
}

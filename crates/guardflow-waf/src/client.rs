//! WAF-regional JSON API client
//!
//! Speaks the service's JSON 1.1 protocol: POST to the endpoint root with an
//! `X-Amz-Target` header naming the operation. Request signing is delegated to
//! the endpoint (an emulator or a signing proxy), so the client stays a thin
//! protocol layer.

use crate::codes;
use crate::error::{Result, WafError};
use async_trait::async_trait;
use guardflow_gate::{ApiError, ChangeTokenSource};
use serde_json::{Value, json};

const TARGET_PREFIX: &str = "AWSWAF_Regional_20161128";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// HTTP client for one WAF-regional endpoint.
pub struct WafRegionalClient {
    http: reqwest::Client,
    endpoint: String,
    region: String,
}

impl WafRegionalClient {
    pub fn new(endpoint: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            region: region.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// POST one operation and decode the JSON response.
    async fn post(&self, operation: &str, payload: &Value) -> Result<Value> {
        let target = format!("{TARGET_PREFIX}.{operation}");
        tracing::debug!(region = %self.region, %target, "calling WAF API");

        let response = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", CONTENT_TYPE)
            .header("X-Amz-Target", target)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let (code, message) = decode_error_body(status, &body);
            return Err(WafError::Service { code, message });
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch a change token via `GetChangeToken`.
    pub async fn get_change_token(&self) -> Result<String> {
        let body = self.post("GetChangeToken", &json!({})).await?;
        body.get("ChangeToken")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or(WafError::MissingToken)
    }

    /// Submit one mutating operation, injecting `token` into the payload.
    pub async fn submit_change(&self, operation: &str, token: &str, payload: Value) -> Result<Value> {
        let payload = inject_token(payload, token);
        self.post(operation, &payload).await
    }
}

/// Inject the change token into a mutating call's payload. Non-object payloads
/// pass through unchanged; the service rejects those itself.
fn inject_token(mut payload: Value, token: &str) -> Value {
    if let Value::Object(fields) = &mut payload {
        fields.insert("ChangeToken".to_string(), Value::String(token.to_owned()));
    }
    payload
}

/// Lenient decode of a failed response. A JSON envelope carries the code in
/// `__type`, namespaced after a `#` when the service qualifies it. Anything
/// else (HTML from a proxy, auth-layer rejections) is a terminal HTTP failure,
/// never a retryable service signal.
fn decode_error_body(status: reqwest::StatusCode, body: &str) -> (String, String) {
    if let Ok(envelope) = serde_json::from_str::<Value>(body)
        && let Some(raw) = envelope.get("__type").and_then(Value::as_str)
    {
        let code = raw.rsplit('#').next().unwrap_or(raw).to_string();
        let message = envelope
            .get("message")
            .or_else(|| envelope.get("Message"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return (code, message);
    }
    (
        codes::HTTP_ERROR.to_string(),
        format!("HTTP {status}: {}", body.trim()),
    )
}

#[async_trait]
impl ChangeTokenSource for WafRegionalClient {
    async fn issue_change_token(&self) -> std::result::Result<String, ApiError> {
        self.get_change_token().await.map_err(ApiError::from)
    }
}

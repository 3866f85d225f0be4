//! Gateway for the HTTP generation service.
//!
//! [`HttpGateway`] posts each [`GenerationRequest`] as JSON to
//! `{base_url}/api/generate/{stage}` and unpacks the
//! `{"status": "success", "<field>": [...]}` envelope.

use super::{parse_envelope, GenerationGateway};
use crate::config::WizardConfig;
use crate::error::{GenerationFailure, Result};
use crate::request::GenerationRequest;
use crate::WizardError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Gateway that talks to the generation service over HTTP.
///
/// A single POST per call. The client timeout bounds the whole round trip
/// and surfaces as [`GenerationFailure::Timeout`].
///
/// # Example
///
/// ```
/// use content_wizard::HttpGateway;
/// use std::time::Duration;
///
/// let gateway = HttpGateway::builder("http://localhost:8000")
///     .timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
/// assert_eq!(gateway.base_url(), "http://localhost:8000");
/// ```
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a new builder.
    pub fn builder(base_url: impl Into<String>) -> HttpGatewayBuilder {
        HttpGatewayBuilder {
            client: None,
            base_url: base_url.into(),
            timeout: None,
        }
    }

    /// Build from a validated [`WizardConfig`].
    pub fn from_config(config: &WizardConfig) -> Result<Self> {
        config.validate()?;
        Self::builder(&config.base_url)
            .timeout(config.timeout())
            .build()
    }

    /// Normalized base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport_failure(url: &str, err: reqwest::Error) -> GenerationFailure {
        if err.is_timeout() {
            GenerationFailure::Timeout {
                url: url.to_string(),
            }
        } else {
            GenerationFailure::Connection {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl GenerationGateway for HttpGateway {
    async fn invoke(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<Vec<String>, GenerationFailure> {
        let url = format!("{}{}", self.base_url, request.path());
        debug!(stage = %request.stage, url = %url, "posting generation request");

        let resp = self
            .client
            .post(&url)
            .json(&request.payload)
            .send()
            .await
            .map_err(|e| Self::transport_failure(&url, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = error_detail(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            warn!(stage = %request.stage, status = status.as_u16(), %message, "generation service returned an error status");
            return Err(GenerationFailure::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Self::transport_failure(&url, e))?;
        let envelope: Value = serde_json::from_str(&body)?;
        parse_envelope(request.stage, &envelope)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"detail": "..."}` and `{"detail": {"message": "..."}}`;
/// otherwise falls back to the trimmed raw body. `None` for an empty body.
fn error_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(json) = serde_json::from_str::<Value>(trimmed) {
        match json.get("detail") {
            Some(Value::String(s)) => return Some(s.clone()),
            Some(detail) => {
                if let Some(msg) = detail.get("message").and_then(Value::as_str) {
                    return Some(msg.to_string());
                }
            }
            None => {}
        }
    }
    Some(trimmed.to_string())
}

/// Builder for [`HttpGateway`].
pub struct HttpGatewayBuilder {
    client: Option<Client>,
    base_url: String,
    timeout: Option<Duration>,
}

impl HttpGatewayBuilder {
    /// Set the HTTP client. If not set, a default client is created.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the round-trip timeout. Default: 60 seconds.
    ///
    /// Ignored when a custom `Client` is provided via `.client()`; that
    /// client's own timeout applies.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the gateway.
    pub fn build(self) -> Result<HttpGateway> {
        let base_url = normalize_base_url(&self.base_url);
        if base_url.is_empty() {
            return Err(WizardError::InvalidConfig(
                "generation service base URL cannot be empty".to_string(),
            ));
        }
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .timeout(self.timeout.unwrap_or(Duration::from_secs(60)))
                .build()
                .map_err(|e| {
                    WizardError::InvalidConfig(format!("failed to build HTTP client: {}", e))
                })?,
        };
        Ok(HttpGateway { client, base_url })
    }
}

/// Strip trailing slashes and a trailing `/api` so endpoint paths are not doubled.
/// e.g. "http://localhost:8000/api/" -> "http://localhost:8000"
fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    for suffix in ["/api/generate", "/api"] {
        if let Some(stripped) = trimmed.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    trimmed.to_string()
}

//! HTTP transport over `reqwest`.

use crate::config::Config;
use crate::dispatch::ToolRequest;
use crate::error::TransportError;
use crate::transport::Transport;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// JSON-over-HTTP transport for the analyst backend.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(config.api_url.clone(), config.request_timeout())
    }

    fn url(&self, request: &ToolRequest) -> String {
        format!("{}{}", self.base_url, request.endpoint.path())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, request: &ToolRequest) -> Result<Value, TransportError> {
        let url = self.url(request);
        tracing::debug!(url = %url, kind = %request.kind, "POST");

        let response = self
            .client
            .post(&url)
            .json(&request.payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::network(format!(
                        "timeout of {}ms exceeded",
                        self.timeout.as_millis()
                    ))
                } else if e.is_connect() {
                    TransportError::network(format!("Connection failed: {}", e))
                } else {
                    TransportError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            // Error bodies are optional; only a string `detail` is used
            let detail = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("detail").and_then(Value::as_str).map(str::to_string));
            tracing::warn!(status = status.as_u16(), detail = ?detail, "Backend returned an error status");
            return Err(TransportError::status(status.as_u16(), detail));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::network(format!("Invalid JSON response body: {}", e)))
    }
}

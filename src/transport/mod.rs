//! Transport seam between tool controllers and the analyst backend.

pub mod http;

use crate::dispatch::ToolRequest;
use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;

pub use http::HttpTransport;

/// Sends a built request and returns the decoded JSON body.
///
/// Non-2xx statuses and network failures are reported as [`TransportError`];
/// timeouts are the implementation's concern.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, request: &ToolRequest) -> Result<Value, TransportError>;
}

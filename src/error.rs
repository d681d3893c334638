use std::fmt;
use thiserror::Error;

use crate::state::Phase;

/// Failures of the extraction schema validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("JSON schema is required")]
    EmptyInput,

    #[error("Invalid JSON schema: {0}")]
    MalformedJson(String),

    #[error("Schema must be a JSON object")]
    NotAnObject,
}

/// Failures of the file ingestion guard.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestionError {
    #[error("File size exceeds 5MB limit ({size} bytes, limit {limit})")]
    TooLarge { size: u64, limit: u64 },

    #[error("Failed to read file: {0}")]
    ReadFailure(String),
}

/// Violated preconditions discovered while building a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Question cannot be empty")]
    EmptyQuestion,

    #[error("Text field is required")]
    EmptyText,

    #[error("JSON schema is required")]
    EmptySchema,

    #[error(transparent)]
    Schema(SchemaError),
}

impl From<SchemaError> for DispatchError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::EmptyInput => DispatchError::EmptySchema,
            other => DispatchError::Schema(other),
        }
    }
}

/// A response that arrived but does not match the contract for its (kind, mode) pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Invalid response format: missing '{0}'")]
    MissingField(&'static str),

    #[error("Invalid response format: {0}")]
    InvalidResponseShape(String),
}

/// Network failure or non-2xx status reported by a transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    /// HTTP status, when a response was received at all.
    pub status: Option<u16>,
    /// Server-provided `detail` field from the error body.
    pub detail: Option<String>,
    /// Transport-level error text.
    pub message: String,
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            detail: None,
            message: message.into(),
        }
    }

    pub fn status(status: u16, detail: Option<String>) -> Self {
        Self {
            status: Some(status),
            detail,
            message: format!("Request failed with status code {}", status),
        }
    }

    /// Message preference: server `detail`, then transport text, then `fallback`.
    pub fn display_message(&self, fallback: &str) -> String {
        self.detail
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .or_else(|| Some(self.message.as_str()).filter(|m| !m.trim().is_empty()))
            .unwrap_or(fallback)
            .to_string()
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_message("Request failed"))
    }
}

/// Errors surfaced by a tool controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// A required field failed the local check before any dispatch.
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("A request is already in flight for this tool")]
    Busy,

    #[error("Cannot {action} while {from:?}")]
    InvalidTransition { from: Phase, action: &'static str },

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error("Export failed: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_preferred_over_transport_text() {
        let err = TransportError::status(500, Some("Error processing question: boom".into()));
        assert_eq!(
            err.display_message("Failed to get answer"),
            "Error processing question: boom"
        );
    }

    #[test]
    fn test_transport_text_used_without_detail() {
        let err = TransportError::status(502, None);
        assert_eq!(
            err.display_message("Failed to get answer"),
            "Request failed with status code 502"
        );
    }

    #[test]
    fn test_fallback_when_nothing_usable() {
        let err = TransportError::network("");
        assert_eq!(err.display_message("Failed to get answer"), "Failed to get answer");
    }

    #[test]
    fn test_tool_error_shows_server_detail() {
        let err = ToolError::from(TransportError::status(400, Some("Schema is required".into())));
        assert_eq!(err.to_string(), "Schema is required");
    }

    #[test]
    fn test_empty_schema_input_maps_to_empty_schema() {
        assert_eq!(
            DispatchError::from(SchemaError::EmptyInput),
            DispatchError::EmptySchema
        );
        assert_eq!(
            DispatchError::from(SchemaError::NotAnObject),
            DispatchError::Schema(SchemaError::NotAnObject)
        );
    }
}

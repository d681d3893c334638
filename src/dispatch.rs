//! Request construction per tool and mode.
//!
//! # Endpoint selection
//! | kind    | Manual              | Autonomous      |
//! |---------|---------------------|-----------------|
//! | QA      | `/api/v1/qa`        | `/api/v1/qa`    |
//! | Summary | `/api/v1/summary`   | `/api/v1/auto`  |
//! | Extract | `/api/v1/extract`   | `/api/v1/auto`  |

use crate::error::DispatchError;
use crate::mode::Mode;
use crate::schema;
use serde_json::{json, Value};
use std::fmt;

/// `max_length` sent with manual summary requests.
pub const SUMMARY_MAX_LENGTH: u32 = 500;

/// Which tool a request or result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Qa,
    Summary,
    Extract,
}

impl ToolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Qa => "qa",
            ToolKind::Summary => "summary",
            ToolKind::Extract => "extract",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend endpoints consumed by the tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Qa,
    Summary,
    Extract,
    Auto,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Qa => "/api/v1/qa",
            Endpoint::Summary => "/api/v1/summary",
            Endpoint::Extract => "/api/v1/extract",
            Endpoint::Auto => "/api/v1/auto",
        }
    }
}

/// Raw user input for one tool submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInput {
    Qa { question: String },
    Summary { text: String },
    Extract { text: String, schema: String },
}

/// An outgoing request: target endpoint plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRequest {
    pub kind: ToolKind,
    pub endpoint: Endpoint,
    pub payload: Value,
}

/// Build the request for `input` under `mode`.
///
/// Pure: no I/O, no state. Extract inputs fail with the most specific
/// error in the order empty text, empty schema, schema error.
pub fn build_request(mode: Mode, input: &ToolInput) -> Result<ToolRequest, DispatchError> {
    let request = match input {
        // QA has no autonomous variant
        ToolInput::Qa { question } => {
            if question.trim().is_empty() {
                return Err(DispatchError::EmptyQuestion);
            }
            ToolRequest {
                kind: ToolKind::Qa,
                endpoint: Endpoint::Qa,
                payload: json!({ "question": question }),
            }
        }
        ToolInput::Summary { text } => {
            if text.trim().is_empty() {
                return Err(DispatchError::EmptyText);
            }
            match mode {
                Mode::Manual => ToolRequest {
                    kind: ToolKind::Summary,
                    endpoint: Endpoint::Summary,
                    payload: json!({ "text": text, "max_length": SUMMARY_MAX_LENGTH }),
                },
                Mode::Autonomous => ToolRequest {
                    kind: ToolKind::Summary,
                    endpoint: Endpoint::Auto,
                    payload: json!({ "text": text }),
                },
            }
        }
        ToolInput::Extract { text, schema: raw_schema } => {
            if text.trim().is_empty() {
                return Err(DispatchError::EmptyText);
            }
            let schema = schema::validate(raw_schema)?;
            let endpoint = match mode {
                Mode::Manual => Endpoint::Extract,
                Mode::Autonomous => Endpoint::Auto,
            };
            ToolRequest {
                kind: ToolKind::Extract,
                endpoint,
                payload: json!({ "text": text, "schema": schema.into_value() }),
            }
        }
    };

    tracing::debug!(
        kind = %request.kind,
        mode = %mode,
        endpoint = request.endpoint.path(),
        "Request built"
    );
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;

    fn extract(text: &str, schema: &str) -> ToolInput {
        ToolInput::Extract {
            text: text.into(),
            schema: schema.into(),
        }
    }

    #[test]
    fn test_qa_ignores_mode() {
        let input = ToolInput::Qa {
            question: "What is the revenue?".into(),
        };
        for mode in [Mode::Manual, Mode::Autonomous] {
            let req = build_request(mode, &input).unwrap();
            assert_eq!(req.endpoint.path(), "/api/v1/qa");
            assert_eq!(req.payload, json!({ "question": "What is the revenue?" }));
        }
    }

    #[test]
    fn test_qa_blank_question() {
        let input = ToolInput::Qa {
            question: "   ".into(),
        };
        assert_eq!(
            build_request(Mode::Manual, &input),
            Err(DispatchError::EmptyQuestion)
        );
    }

    #[test]
    fn test_summary_manual_carries_max_length() {
        let input = ToolInput::Summary {
            text: "Long text".into(),
        };
        let req = build_request(Mode::Manual, &input).unwrap();
        assert_eq!(req.endpoint, Endpoint::Summary);
        assert_eq!(req.payload, json!({ "text": "Long text", "max_length": 500 }));
    }

    #[test]
    fn test_summary_autonomous_targets_router() {
        let input = ToolInput::Summary {
            text: "Long text".into(),
        };
        let req = build_request(Mode::Autonomous, &input).unwrap();
        assert_eq!(req.endpoint.path(), "/api/v1/auto");
        assert_eq!(req.payload, json!({ "text": "Long text" }));
    }

    #[test]
    fn test_summary_blank_text() {
        let input = ToolInput::Summary { text: "\n".into() };
        assert_eq!(
            build_request(Mode::Autonomous, &input),
            Err(DispatchError::EmptyText)
        );
    }

    #[test]
    fn test_extract_payload_identical_across_modes() {
        let input = extract("Acme made 5M", r#"{"company":"string"}"#);
        let manual = build_request(Mode::Manual, &input).unwrap();
        let auto = build_request(Mode::Autonomous, &input).unwrap();

        assert_eq!(manual.endpoint.path(), "/api/v1/extract");
        assert_eq!(auto.endpoint.path(), "/api/v1/auto");
        assert_eq!(manual.payload, auto.payload);
        assert_eq!(
            manual.payload,
            json!({ "text": "Acme made 5M", "schema": { "company": "string" } })
        );
    }

    #[test]
    fn test_extract_error_precedence() {
        assert_eq!(
            build_request(Mode::Manual, &extract("", "not json")),
            Err(DispatchError::EmptyText)
        );
        assert_eq!(
            build_request(Mode::Manual, &extract("text", " ")),
            Err(DispatchError::EmptySchema)
        );
        assert_eq!(
            build_request(Mode::Manual, &extract("text", "[1, 2]")),
            Err(DispatchError::Schema(SchemaError::NotAnObject))
        );
        assert!(matches!(
            build_request(Mode::Manual, &extract("text", "{oops")),
            Err(DispatchError::Schema(SchemaError::MalformedJson(_)))
        ));
    }
}

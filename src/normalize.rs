//! Response normalization.
//!
//! The backend answers in two envelope styles: dedicated endpoints return
//! the payload directly (`{answer}`, `{summary}`, `{data}`), while the
//! routing endpoint wraps it as `{route, result}`. This module maps both
//! onto one canonical [`ToolResult`] per tool.

use crate::dispatch::ToolKind;
use crate::error::NormalizeError;
use crate::mode::Mode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder shown when the router picked a route this client does not know.
pub const UNKNOWN_ROUTE_TEXT: &str = "Unknown route response";

/// One retrieved passage backing a QA answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    #[serde(default)]
    pub page_content: String,
}

/// Outcome of an extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Fields(Map<String, Value>),
    /// Error panel content. `raw_text` holds the offending response when one was received.
    Error {
        error_message: String,
        raw_text: Option<String>,
    },
}

/// Canonical, shape-stable output of a tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    Answer {
        answer_text: String,
        source_documents: Vec<SourceDocument>,
    },
    Summary {
        summary_text: String,
    },
    Extraction(Extraction),
}

impl ToolResult {
    /// Primary text for display: the answer, the summary, or pretty-printed fields.
    pub fn display_text(&self) -> String {
        match self {
            ToolResult::Answer { answer_text, .. } => answer_text.clone(),
            ToolResult::Summary { summary_text } => summary_text.clone(),
            ToolResult::Extraction(Extraction::Fields(fields)) => pretty(fields),
            ToolResult::Extraction(Extraction::Error { error_message, .. }) => {
                format!("Error: {}", error_message)
            }
        }
    }

    /// Whitespace-separated word count of the display text.
    pub fn word_count(&self) -> usize {
        self.display_text().split_whitespace().count()
    }
}

/// Extract the canonical result for `kind` from `envelope`, given the mode
/// the request was sent under.
pub fn normalize(kind: ToolKind, mode: Mode, envelope: &Value) -> Result<ToolResult, NormalizeError> {
    match (kind, mode) {
        (ToolKind::Qa, _) => normalize_answer(envelope),
        (ToolKind::Summary, Mode::Manual) => {
            let summary_text = string_field(envelope, "summary", "summary")?;
            Ok(ToolResult::Summary { summary_text })
        }
        (ToolKind::Summary, Mode::Autonomous) => normalize_routed_summary(envelope),
        (ToolKind::Extract, Mode::Manual) => extract_fields(envelope.get("data")),
        (ToolKind::Extract, Mode::Autonomous) => {
            extract_fields(envelope.get("result").and_then(|r| r.get("data")))
        }
    }
}

fn normalize_answer(envelope: &Value) -> Result<ToolResult, NormalizeError> {
    let answer_text = string_field(envelope, "answer", "answer")?;

    let source_documents = match envelope.get("source_documents") {
        None | Some(Value::Null) => Vec::new(),
        Some(docs @ Value::Array(_)) => Vec::<SourceDocument>::deserialize(docs)
            .map_err(|e| NormalizeError::InvalidResponseShape(format!("source_documents: {}", e)))?,
        Some(_) => {
            return Err(NormalizeError::InvalidResponseShape(
                "source_documents must be an array".into(),
            ))
        }
    };

    Ok(ToolResult::Answer {
        answer_text,
        source_documents,
    })
}

/// Summary tool under the router: the route tag decides which payload becomes the text.
fn normalize_routed_summary(envelope: &Value) -> Result<ToolResult, NormalizeError> {
    let route = envelope.get("route").and_then(Value::as_str);
    let result = envelope.get("result").unwrap_or(&Value::Null);

    let summary_text = match route {
        Some("summary") => string_field(result, "summary", "result.summary")?,
        Some("qa") => string_field(result, "answer", "result.answer")?,
        Some("extract") => match result.get("data") {
            None | Some(Value::Null) => return Err(NormalizeError::MissingField("result.data")),
            Some(data) => pretty(data),
        },
        other => {
            tracing::warn!(route = ?other, "Router returned an unknown route");
            UNKNOWN_ROUTE_TEXT.to_string()
        }
    };

    Ok(ToolResult::Summary { summary_text })
}

fn extract_fields(data: Option<&Value>) -> Result<ToolResult, NormalizeError> {
    match data {
        Some(Value::Object(fields)) => Ok(ToolResult::Extraction(Extraction::Fields(fields.clone()))),
        None | Some(Value::Null) => Err(NormalizeError::InvalidResponseShape(
            "missing extracted data".into(),
        )),
        Some(_) => Err(NormalizeError::InvalidResponseShape(
            "extracted data is not an object".into(),
        )),
    }
}

fn string_field(
    value: &Value,
    key: &str,
    path: &'static str,
) -> Result<String, NormalizeError> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(NormalizeError::MissingField(path))
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_qa_answer_with_sources() {
        let envelope = json!({
            "answer": "10M",
            "source_documents": [{ "page_content": "doc1", "metadata": { "page": 3 } }]
        });

        let result = normalize(ToolKind::Qa, Mode::Autonomous, &envelope).unwrap();

        assert_eq!(
            result,
            ToolResult::Answer {
                answer_text: "10M".into(),
                source_documents: vec![SourceDocument {
                    page_content: "doc1".into()
                }],
            }
        );
    }

    #[test]
    fn test_qa_sources_default_to_empty() {
        let result = normalize(ToolKind::Qa, Mode::Manual, &json!({ "answer": "yes" })).unwrap();
        assert!(matches!(
            result,
            ToolResult::Answer { source_documents, .. } if source_documents.is_empty()
        ));
    }

    #[test]
    fn test_qa_missing_answer() {
        assert_eq!(
            normalize(ToolKind::Qa, Mode::Manual, &json!({ "source_documents": [] })),
            Err(NormalizeError::MissingField("answer"))
        );
    }

    #[test]
    fn test_qa_sources_not_an_array() {
        let envelope = json!({ "answer": "a", "source_documents": "oops" });
        assert!(matches!(
            normalize(ToolKind::Qa, Mode::Manual, &envelope),
            Err(NormalizeError::InvalidResponseShape(_))
        ));
    }

    #[test]
    fn test_summary_manual() {
        let result = normalize(ToolKind::Summary, Mode::Manual, &json!({ "summary": "Short." })).unwrap();
        assert_eq!(result.display_text(), "Short.");
        assert_eq!(
            normalize(ToolKind::Summary, Mode::Manual, &json!({})),
            Err(NormalizeError::MissingField("summary"))
        );
    }

    #[test]
    fn test_summary_manual_ignores_route_wrapper() {
        let envelope = json!({ "route": "summary", "result": { "summary": "wrapped" } });
        assert_eq!(
            normalize(ToolKind::Summary, Mode::Manual, &envelope),
            Err(NormalizeError::MissingField("summary"))
        );
    }

    #[test]
    fn test_summary_routed_to_summary_and_qa() {
        let summary = json!({ "route": "summary", "result": { "summary": "S" } });
        let qa = json!({ "route": "qa", "result": { "answer": "A", "source_documents": [] } });

        assert_eq!(
            normalize(ToolKind::Summary, Mode::Autonomous, &summary).unwrap(),
            ToolResult::Summary { summary_text: "S".into() }
        );
        assert_eq!(
            normalize(ToolKind::Summary, Mode::Autonomous, &qa).unwrap(),
            ToolResult::Summary { summary_text: "A".into() }
        );
    }

    #[test]
    fn test_summary_routed_to_extract_is_pretty_json() {
        let envelope = json!({ "route": "extract", "result": { "data": { "x": 1 } } });

        let result = normalize(ToolKind::Summary, Mode::Autonomous, &envelope).unwrap();

        assert_eq!(result.display_text(), "{\n  \"x\": 1\n}");
    }

    #[test]
    fn test_summary_unknown_route_is_placeholder_success() {
        for envelope in [json!({ "route": "bogus" }), json!({}), json!({ "route": 7 })] {
            assert_eq!(
                normalize(ToolKind::Summary, Mode::Autonomous, &envelope).unwrap(),
                ToolResult::Summary {
                    summary_text: UNKNOWN_ROUTE_TEXT.into()
                }
            );
        }
    }

    #[test]
    fn test_summary_known_route_missing_result() {
        assert_eq!(
            normalize(ToolKind::Summary, Mode::Autonomous, &json!({ "route": "summary" })),
            Err(NormalizeError::MissingField("result.summary"))
        );
        assert_eq!(
            normalize(ToolKind::Summary, Mode::Autonomous, &json!({ "route": "extract", "result": {} })),
            Err(NormalizeError::MissingField("result.data"))
        );
    }

    #[test]
    fn test_extract_manual() {
        let envelope = json!({ "data": { "company": "Acme", "revenue": 5 } });
        let result = normalize(ToolKind::Extract, Mode::Manual, &envelope).unwrap();
        match result {
            ToolResult::Extraction(Extraction::Fields(fields)) => {
                assert_eq!(fields["company"], "Acme");
                assert_eq!(fields["revenue"], 5);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_extract_manual_missing_data() {
        assert!(matches!(
            normalize(ToolKind::Extract, Mode::Manual, &json!({})),
            Err(NormalizeError::InvalidResponseShape(_))
        ));
    }

    #[test]
    fn test_extract_paths_are_mode_specific() {
        let direct = json!({ "data": { "a": 1 } });
        let routed = json!({ "route": "extract", "result": { "data": { "a": 1 } } });

        assert!(normalize(ToolKind::Extract, Mode::Autonomous, &routed).is_ok());
        assert!(normalize(ToolKind::Extract, Mode::Manual, &direct).is_ok());
        assert!(normalize(ToolKind::Extract, Mode::Autonomous, &direct).is_err());
        assert!(normalize(ToolKind::Extract, Mode::Manual, &routed).is_err());
    }

    #[test]
    fn test_extract_data_must_be_object() {
        assert!(matches!(
            normalize(ToolKind::Extract, Mode::Manual, &json!({ "data": [1, 2] })),
            Err(NormalizeError::InvalidResponseShape(_))
        ));
    }

    #[test]
    fn test_word_count() {
        let result = ToolResult::Summary {
            summary_text: "Revenue grew  twelve percent.\nMargins held.".into(),
        };
        assert_eq!(result.word_count(), 6);
    }
}

//! Extraction schema validation.
//!
//! A schema is user-authored JSON text mapping field names to type tokens,
//! e.g. `{"company": "string", "revenue": "number"}`. Only the structural
//! shape is enforced here: the text must decode to a JSON object. Type
//! tokens are advisory to the backend and are never rejected client-side.

use crate::error::SchemaError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Sample text paired with the market research preset.
pub const MARKET_RESEARCH_SAMPLE_TEXT: &str = "Innovate Inc. reported $12 million in revenue for Q3 2025. Competitors include FutureFlow and Synergy Systems. Innovate Inc. holds a 12% market share.";

/// A validated extraction schema. Field order follows the source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExtractionSchema(Map<String, Value>);

/// Declared type of a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Array,
    Boolean,
    Object,
    /// Any other declaration, kept verbatim.
    Other(String),
}

impl FieldType {
    fn from_declaration(value: &Value) -> Self {
        match value.as_str() {
            Some("string") => FieldType::String,
            Some("number") => FieldType::Number,
            Some("array") => FieldType::Array,
            Some("boolean") => FieldType::Boolean,
            Some("object") => FieldType::Object,
            Some(other) => FieldType::Other(other.to_string()),
            None => FieldType::Other(value.to_string()),
        }
    }
}

/// Built-in schemas users can start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaPreset {
    Basic,
    MarketResearch,
}

impl SchemaPreset {
    pub fn schema(&self) -> ExtractionSchema {
        let mut fields = vec![
            ("company", "string"),
            ("revenue", "number"),
            ("period", "string"),
            ("competitors", "array"),
        ];
        if *self == SchemaPreset::MarketResearch {
            fields.push(("market_share", "string"));
        }

        let mut map = Map::new();
        for (name, declared) in fields {
            map.insert(name.to_string(), Value::String(declared.to_string()));
        }
        ExtractionSchema(map)
    }

    /// Sample input text, if the preset ships one.
    pub fn sample_text(&self) -> Option<&'static str> {
        match self {
            SchemaPreset::Basic => None,
            SchemaPreset::MarketResearch => Some(MARKET_RESEARCH_SAMPLE_TEXT),
        }
    }
}

impl ExtractionSchema {
    /// Iterate fields in declaration order with their advisory types.
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.0
            .iter()
            .map(|(name, decl)| (name.as_str(), FieldType::from_declaration(decl)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Two-space indented JSON, suitable for an editable schema field.
    pub fn to_pretty_text(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Parse and validate raw schema text.
///
/// # Errors
/// - `EmptyInput` when the text is blank after trimming
/// - `MalformedJson` when it is not JSON
/// - `NotAnObject` for arrays and every primitive JSON value
pub fn validate(raw_text: &str) -> Result<ExtractionSchema, SchemaError> {
    if raw_text.trim().is_empty() {
        return Err(SchemaError::EmptyInput);
    }

    let parsed: Value =
        serde_json::from_str(raw_text).map_err(|e| SchemaError::MalformedJson(e.to_string()))?;

    match parsed {
        Value::Object(map) => {
            tracing::debug!(fields = map.len(), "Extraction schema validated");
            Ok(ExtractionSchema(map))
        }
        _ => Err(SchemaError::NotAnObject),
    }
}

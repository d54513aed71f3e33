//! Schema boundary for generated records
//!
//! Model output is untrusted JSON. It is parsed here into a
//! [`DecompositionRecord`] with the same defaults the record type declares;
//! anything that cannot be shaped into a record is a [`SchemaError`], which
//! callers treat as a generation failure rather than a structural violation.

use crate::record::DecompositionRecord;
use schemars::gen::SchemaSettings;
use serde_json::Value;

/// Name under which the record schema is published to structured-output APIs
pub const SCHEMA_NAME: &str = "WordEtymology";

/// Description accompanying [`SCHEMA_NAME`]
pub const SCHEMA_DESCRIPTION: &str =
    "A word broken down into its etymological parts with layers of combinations";

/// Errors raised while shaping raw output into a record
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Input was not valid JSON, or did not match the record shape
    #[error("response does not match the record schema: {0}")]
    Mismatch(#[from] serde_json::Error),

    /// Top-level value was not a JSON object
    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl DecompositionRecord {
    /// Parse a record from JSON text
    ///
    /// # Errors
    /// - `SchemaError::NotAnObject` if the top-level value is not an object
    /// - `SchemaError::Mismatch` for malformed JSON, missing `id`/`text`/
    ///   `originalWord`, or mistyped fields
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Shape an already-parsed JSON value into a record
    ///
    /// Unknown fields are ignored.
    ///
    /// # Errors
    /// Same as [`DecompositionRecord::from_json`].
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        if !value.is_object() {
            return Err(SchemaError::NotAnObject {
                found: kind_of(&value),
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Pretty-printed JSON form, as replayed into feedback transcripts
    #[must_use]
    pub fn to_pretty_json(&self) -> String {
        // Plain structs with string keys cannot fail to serialize.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// JSON Schema describing [`DecompositionRecord`]
///
/// Sub-schemas are inlined so the result has no `$ref`s; function-calling
/// APIs accept it as a self-contained `parameters` object.
#[must_use]
pub fn record_json_schema() -> Value {
    let schema = SchemaSettings::draft07()
        .with(|s| s.inline_subschemas = true)
        .into_generator()
        .into_root_schema_for::<DecompositionRecord>();
    serde_json::to_value(schema).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_applied() {
        let record = DecompositionRecord::from_json(
            r#"{
                "parts": [{"id": "de", "text": "de", "originalWord": "de-"}],
                "combinations": [[{"id": "x", "text": "de"}]]
            }"#,
        )
        .unwrap();

        assert_eq!(record.thought, "");
        assert_eq!(record.parts[0].origin, "Unknown");
        assert_eq!(record.parts[0].meaning, "");
        assert_eq!(record.combinations[0][0].definition, "");
        assert!(record.combinations[0][0].source_ids.is_empty());
    }

    #[test]
    fn empty_object_is_an_empty_record() {
        let record = DecompositionRecord::from_json("{}").unwrap();
        assert_eq!(record, DecompositionRecord::default());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let record =
            DecompositionRecord::from_json(r#"{"thought": "t", "confidence": 0.4}"#).unwrap();
        assert_eq!(record.thought, "t");
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let err = DecompositionRecord::from_json(r#"{"parts": [{"id": "de", "text": "de"}]}"#)
            .unwrap_err();
        assert!(matches!(err, SchemaError::Mismatch(_)));
        assert!(err.to_string().contains("originalWord"));
    }

    #[test]
    fn non_object_is_rejected() {
        let err = DecompositionRecord::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, SchemaError::NotAnObject { found: "array" }));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(DecompositionRecord::from_json("{\"parts\": [").is_err());
    }

    #[test]
    fn camel_case_round_trip() {
        let json = DecompositionRecord::fallback().to_pretty_json();
        assert!(json.contains("\"originalWord\""));
        assert!(json.contains("\"sourceIds\""));
        assert_eq!(
            DecompositionRecord::from_json(&json).unwrap(),
            DecompositionRecord::fallback()
        );
    }

    #[test]
    fn schema_lists_record_fields() {
        let schema = record_json_schema();
        let props = &schema["properties"];
        assert!(props.get("parts").is_some());
        assert!(props.get("combinations").is_some());
        assert!(props.get("thought").is_some());
        assert!(!schema.to_string().contains("$ref"));
    }
}

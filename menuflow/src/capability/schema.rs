//! Output schemas requested from the capability and the checks applied to
//! what comes back.

use crate::errors::CapabilityError;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::LazyLock;

/// Name of the filter set schema.
pub const FILTER_SET_SCHEMA: &str = "FilterSet";

/// Name of the candidate dish list schema.
pub const CANDIDATE_DISHES_SCHEMA: &str = "CandidateDishList";

/// A structured output shape: a named JSON Schema object whose properties
/// are (optionally nullable) lists of strings.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    name: String,
    description: String,
    schema: Value,
}

impl OutputSchema {
    /// Creates a schema from a JSON Schema document.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
        }
    }

    /// Four optional string lists describing the inclusion criteria of a question.
    #[must_use]
    pub fn filter_set() -> Self {
        let nullable_list = |description: &str| {
            serde_json::json!({
                "type": ["array", "null"],
                "items": {"type": "string"},
                "description": description,
            })
        };

        Self::new(
            FILTER_SET_SCHEMA,
            "Criteri di inclusione estratti dalla domanda",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "ingredients_or_techniques": nullable_list("Le tecniche o gli ingredienti inclusi nei piatti da trovare"),
                    "chefs": nullable_list("Gli chef citati nella domanda"),
                    "planets": nullable_list("I pianeti citati nella domanda"),
                    "restaurants": nullable_list("I ristoranti citati nella domanda"),
                },
                "required": [],
                "additionalProperties": false,
            }),
        )
    }

    /// A required list of candidate dish names.
    #[must_use]
    pub fn candidate_dishes() -> Self {
        Self::new(
            CANDIDATE_DISHES_SCHEMA,
            "I nomi dei piatti che rispondono alla domanda",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "dishes": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "La lista dei nomi delle ricette",
                    },
                },
                "required": ["dishes"],
                "additionalProperties": false,
            }),
        )
    }

    /// The schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The schema description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The JSON Schema document.
    #[must_use]
    pub const fn schema(&self) -> &Value {
        &self.schema
    }

    fn property_types(&self, property: &str) -> Vec<&str> {
        match self.schema.pointer(&format!("/properties/{property}/type")) {
            Some(Value::String(t)) => vec![t.as_str()],
            Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Checks that `value` is an instance of this schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaViolation` naming the first offending property.
    pub fn check(&self, value: &Value) -> Result<(), CapabilityError> {
        let violation = |reason: String| CapabilityError::schema_violation(&self.name, reason);

        let Some(object) = value.as_object() else {
            return Err(violation(format!("expected an object, got {value}")));
        };

        let required = self
            .schema
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default();

        for field in required {
            if !object.contains_key(field) {
                return Err(violation(format!("missing required property '{field}'")));
            }
        }

        for (key, item) in object {
            let types = self.property_types(key);
            if types.is_empty() {
                // Unknown properties are tolerated and ignored on deserialization.
                continue;
            }
            let ok = match item {
                Value::Null => types.contains(&"null"),
                Value::Array(entries) => {
                    types.contains(&"array") && entries.iter().all(Value::is_string)
                }
                _ => false,
            };
            if !ok {
                return Err(violation(format!(
                    "property '{key}' must be {}, got {item}",
                    types.join(" or ")
                )));
            }
        }

        Ok(())
    }

    /// Checks `value` and deserializes it into `T`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaViolation` if the check or the deserialization fails.
    pub fn parse<T: DeserializeOwned>(&self, value: Value) -> Result<T, CapabilityError> {
        self.check(&value)?;
        serde_json::from_value(value)
            .map_err(|e| CapabilityError::schema_violation(&self.name, e.to_string()))
    }
}

#[allow(clippy::expect_used)]
static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fence pattern is valid"));

/// Parses model output text as JSON, unwrapping a fenced code block if present.
///
/// # Errors
///
/// Returns `SchemaViolation` if the text is not JSON.
pub fn parse_json_content(schema: &str, content: &str) -> Result<Value, CapabilityError> {
    let body = FENCE
        .captures(content)
        .and_then(|c| c.get(1))
        .map_or(content.trim(), |m| m.as_str());

    serde_json::from_str(body).map_err(|e| {
        CapabilityError::schema_violation(schema, format!("output is not valid JSON: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CandidateDishList, FilterSet};
    use serde_json::json;

    #[test]
    fn test_filter_set_schema_accepts_partial_object() {
        let schema = OutputSchema::filter_set();
        let filters: FilterSet = schema
            .parse(json!({"ingredients_or_techniques": ["pizza"], "chefs": null}))
            .unwrap();

        assert_eq!(filters.terms(), ["pizza".to_string()]);
        assert_eq!(filters.chefs, None);
    }

    #[test]
    fn test_filter_set_schema_rejects_non_string_items() {
        let err = OutputSchema::filter_set()
            .check(&json!({"planets": [1, 2]}))
            .unwrap_err();

        assert!(err.to_string().contains("planets"));
    }

    #[test]
    fn test_candidate_schema_requires_dishes() {
        let schema = OutputSchema::candidate_dishes();
        assert!(schema.check(&json!({})).is_err());
        assert!(schema.check(&json!({"dishes": null})).is_err());
        assert!(schema.check(&json!("Pizza")).is_err());

        let list: CandidateDishList = schema.parse(json!({"dishes": ["Pizza"]})).unwrap();
        assert_eq!(list.dishes, vec!["Pizza"]);
    }

    #[test]
    fn test_parse_json_content_plain() {
        let value = parse_json_content("S", r#" {"dishes": ["Ramen"]} "#).unwrap();
        assert_eq!(value, json!({"dishes": ["Ramen"]}));
    }

    #[test]
    fn test_parse_json_content_fenced() {
        let content = "Ecco il risultato:\n```json\n{\"dishes\": [\"Ramen\"]}\n```\n";
        let value = parse_json_content("S", content).unwrap();
        assert_eq!(value, json!({"dishes": ["Ramen"]}));
    }

    #[test]
    fn test_parse_json_content_invalid() {
        let err = parse_json_content("CandidateDishList", "Non lo so").unwrap_err();
        assert!(matches!(err, CapabilityError::SchemaViolation { ref schema, .. } if schema == "CandidateDishList"));
    }
}

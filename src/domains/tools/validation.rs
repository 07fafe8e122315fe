//! Field-level validation for tool inputs and outputs.
//!
//! Inputs are first checked against the tool's generated JSON Schema:
//! required properties, property types and numeric bounds. Every violation
//! is collected before anything is deserialized. Constraints the schema
//! cannot express go through [`Validate`], which the dispatcher runs as an
//! explicit gate before and after every handler call.

use std::fmt::Display;

use serde::Serialize;
use serde_json::{Map, Value};

/// A single violated constraint, reported back to the client.
///
/// `loc` is the path to the offending value, rooted at `"body"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldViolation {
    /// Create a violation for a top-level body field.
    pub fn new(field: &str, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    /// Create a violation that applies to the body as a whole.
    pub fn body(msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".to_string()],
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    /// Value must be `<= max`.
    pub fn less_than_equal(field: &str, max: impl Display) -> Self {
        Self::new(
            field,
            format!("Input should be less than or equal to {}", max),
            "less_than_equal",
        )
    }

    /// Value must be `>= min`.
    pub fn greater_than_equal(field: &str, min: impl Display) -> Self {
        Self::new(
            field,
            format!("Input should be greater than or equal to {}", min),
            "greater_than_equal",
        )
    }

    /// Value does not have the JSON type the schema declares.
    pub fn wrong_type(field: &str, expected: &str) -> Self {
        let (msg, kind) = match expected {
            "string" => ("Input should be a valid string", "string_type"),
            "integer" => ("Input should be a valid integer", "int_type"),
            "number" => ("Input should be a valid number", "float_type"),
            "boolean" => ("Input should be a valid boolean", "bool_type"),
            "array" => ("Input should be a valid list", "list_type"),
            "object" => ("Input should be a valid dictionary", "dict_type"),
            _ => ("Input has an unexpected type", "type_error"),
        };
        Self::new(field, msg, kind)
    }

    /// Translate a serde_json deserialization failure into a violation.
    ///
    /// Only reached for inputs the schema check accepted. serde stops at the
    /// first problem, so this yields exactly one entry.
    /// Missing and unknown fields are attributed to the field by name.
    pub fn from_serde(err: &serde_json::Error) -> Self {
        let message = err.to_string();

        if let Some(field) = backticked_after(&message, "missing field `") {
            return Self::new(field, "Field required", "missing");
        }

        if let Some(field) = backticked_after(&message, "unknown field `") {
            return Self::new(field, "Extra inputs are not permitted", "extra_forbidden");
        }

        let kind = match err.classify() {
            serde_json::error::Category::Data => "type_error",
            _ => "json_invalid",
        };
        Self::body(message, kind)
    }
}

/// Extract the text between `prefix` and the next backtick.
fn backticked_after<'a>(message: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = &message[message.find(prefix)? + prefix.len()..];
    rest.find('`').map(|end| &rest[..end])
}

/// Check a JSON object against an object schema.
///
/// Supports the keywords schemars emits for flat parameter structs:
/// `required`, and per property `type` (single or list), `minimum` and
/// `maximum`. Properties whose schema carries no `type` are not checked.
/// Violations come out in the schema's property order, missing fields
/// included.
pub fn schema_violations(value: &Value, schema: &Value) -> Vec<FieldViolation> {
    let Some(object) = value.as_object() else {
        return vec![FieldViolation::body(
            "Input should be a valid dictionary or object to extract fields from",
            "model_attributes_type",
        )];
    };

    let empty = Map::new();
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut violations = Vec::new();
    for (field, property) in properties {
        match object.get(field) {
            Some(found) => violations.extend(property_violation(field, found, property)),
            None if required.contains(&field.as_str()) => {
                violations.push(FieldViolation::new(field, "Field required", "missing"));
            }
            None => {}
        }
    }
    violations
}

fn property_violation(field: &str, value: &Value, property: &Value) -> Option<FieldViolation> {
    let declared: Vec<&str> = match property.get("type") {
        Some(Value::String(name)) => vec![name.as_str()],
        Some(Value::Array(names)) => names.iter().filter_map(Value::as_str).collect(),
        _ => return None,
    };

    if !declared.iter().any(|name| has_type(value, name)) {
        let expected = declared.iter().find(|name| **name != "null").unwrap_or(&"null");
        return Some(FieldViolation::wrong_type(field, expected));
    }

    let number = value.as_f64()?;
    let bound = |keyword: &str, breached: fn(f64, f64) -> bool| {
        property
            .get(keyword)
            .filter(|b| b.as_f64().is_some_and(|b| breached(number, b)))
    };

    if let Some(max) = bound("maximum", |n, max| n > max) {
        return Some(FieldViolation::less_than_equal(field, max));
    }
    bound("minimum", |n, min| n < min).map(|min| FieldViolation::greater_than_equal(field, min))
}

fn has_type(value: &Value, name: &str) -> bool {
    match name {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        _ => true,
    }
}

/// Constraints a tool input or output must satisfy beyond its shape.
pub trait Validate {
    /// Return every violated constraint; an empty list means valid.
    fn validate(&self) -> Vec<FieldViolation> {
        Vec::new()
    }
}

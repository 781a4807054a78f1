//! Payload normalization and field extraction.
//!
//! The survey platform is inconsistent about how it posts the embedded data:
//! sometimes flat, sometimes wrapped under a single key, sometimes with that
//! wrapper holding a JSON-encoded string. `normalize_payload` undoes the
//! wrapping exactly once, with a fixed precedence:
//!
//! 1. `{"k": {...}}`      → the inner object
//! 2. `{"k": "<json>"}`   → the parsed string, if it parses; otherwise unchanged
//! 3. anything else       → unchanged

use serde_json::{json, Map, Value};

use crate::errors::AppError;
use crate::feedback::models::{
    field_preview, type_tag, Condition, FeedbackRequest, MAX_ECHOED_KEYS,
};

const REQUIRED_FIELDS: [&str; 3] = ["condition", "problem", "reasoning"];

/// Parses a raw request body. Bodies that are not JSON become `Null`, which
/// then fails validation like any other empty payload.
pub fn parse_body(raw: &[u8]) -> Value {
    serde_json::from_slice(raw).unwrap_or(Value::Null)
}

/// Unwraps a single-key wrapper object. Pure; applied once.
pub fn normalize_payload(body: Value) -> Value {
    let wrapped = match &body {
        Value::Object(map) if map.len() == 1 => map.values().next().cloned(),
        _ => None,
    };

    match wrapped {
        Some(inner @ Value::Object(_)) => inner,
        Some(Value::String(encoded)) => serde_json::from_str(&encoded).unwrap_or(body),
        _ => body,
    }
}

/// Loose truthiness: missing, `null`, `false`, `0`, and blank strings are falsy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Renders a truthy field as text. Strings are kept verbatim; other truthy
/// values are rendered as compact JSON.
pub fn field_text(value: Option<&Value>) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Validates a normalized payload into a `FeedbackRequest`.
///
/// Missing fields are reported before an unrecognized condition, so a request
/// lacking `problem` gets "Missing required fields" even if its condition is
/// also bogus.
pub fn extract_request(payload: &Value) -> Result<FeedbackRequest, AppError> {
    let empty = Map::new();
    let fields = payload.as_object().unwrap_or(&empty);

    if !REQUIRED_FIELDS.iter().all(|f| is_truthy(fields.get(*f))) {
        return Err(missing_fields(payload, fields));
    }

    let raw_condition = &fields["condition"];
    let condition = raw_condition
        .as_str()
        .and_then(|s| s.parse::<Condition>().ok())
        .ok_or_else(|| AppError::InvalidCondition {
            received: raw_condition.clone(),
        })?;

    // All three were checked truthy above, so field_text yields Some.
    let problem = field_text(fields.get("problem")).unwrap_or_default();
    let reasoning = field_text(fields.get("reasoning")).unwrap_or_default();

    Ok(FeedbackRequest {
        condition,
        problem,
        answer: field_text(fields.get("answer")),
        reasoning,
    })
}

fn missing_fields(payload: &Value, fields: &Map<String, Value>) -> AppError {
    let received = json!({
        "condition": field_preview(fields.get("condition")),
        "problem": field_preview(fields.get("problem")),
        "answer": field_preview(fields.get("answer")),
        "reasoning": field_preview(fields.get("reasoning")),
        "payload_type": type_tag(Some(payload)),
    });

    AppError::MissingFields {
        received,
        received_keys: fields.keys().take(MAX_ECHOED_KEYS).cloned().collect(),
    }
}

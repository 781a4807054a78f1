use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{json, Map, Value};

/// Characters of a string field echoed back in diagnostics.
pub const PREVIEW_CHARS: usize = 120;
/// Top-level payload keys echoed back in diagnostics.
pub const MAX_ECHOED_KEYS: usize = 20;

/// The experimental arm a participant was assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Validate and affirm the participant's reasoning.
    Sycophantic,
    /// Challenge the reasoning through reflective questions.
    Dialectical,
}

impl FromStr for Condition {
    type Err = ();

    /// Exact, case-sensitive match. The survey platform sends the literal values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sycophantic" => Ok(Condition::Sycophantic),
            "dialectical" => Ok(Condition::Dialectical),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Sycophantic => f.write_str("sycophantic"),
            Condition::Dialectical => f.write_str("dialectical"),
        }
    }
}

/// A validated inbound request. Only constructed once the required fields
/// have passed the truthiness check and the condition has been recognized.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRequest {
    pub condition: Condition,
    pub problem: String,
    pub answer: Option<String>,
    pub reasoning: String,
}

/// The three message blocks sent to the provider, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptBundle {
    pub system_instruction: String,
    pub condition_instruction: String,
    pub user_content: String,
}

/// Successful response body.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackResponse {
    pub ai_feedback: String,
}

/// Runtime type tag for a JSON value, in the vocabulary the survey
/// platform's developers see in their own console.
pub fn type_tag(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// Truncated diagnostic view of one received field. Never echoes more than
/// `PREVIEW_CHARS` characters of a string and never echoes containers.
pub fn field_preview(value: Option<&Value>) -> Value {
    let mut preview = Map::new();
    preview.insert("type".into(), json!(type_tag(value)));
    match value {
        Some(Value::String(s)) => {
            preview.insert(
                "preview".into(),
                json!(s.chars().take(PREVIEW_CHARS).collect::<String>()),
            );
            preview.insert("length".into(), json!(s.chars().count()));
        }
        Some(v @ (Value::Bool(_) | Value::Number(_))) => {
            preview.insert("preview".into(), v.clone());
        }
        Some(Value::Array(items)) => {
            preview.insert("length".into(), json!(items.len()));
        }
        _ => {}
    }
    Value::Object(preview)
}

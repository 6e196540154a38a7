//! Agent output and its conversion to display text.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Final output of one agent run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AgentOutput {
    Text(String),
    Structured(Value),
    Empty,
}

impl AgentOutput {
    /// Interprets raw model text: JSON objects and arrays become structured.
    pub fn from_model_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return AgentOutput::Empty;
        }
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
                return AgentOutput::Structured(value);
            }
        }
        AgentOutput::Text(text)
    }

    /// Text shown to the operator.
    ///
    /// A structured record with a `narrative` field shows that field only.
    pub fn into_display_text(self) -> String {
        match self {
            AgentOutput::Text(text) => text,
            AgentOutput::Empty => String::new(),
            AgentOutput::Structured(Value::Object(mut map)) if map.contains_key("narrative") => {
                value_to_text(map.remove("narrative").unwrap_or(Value::Null))
            }
            AgentOutput::Structured(value) => value_to_text(value),
        }
    }
}

/// Strings as-is, null as empty, anything else as pretty JSON.
pub fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string()),
    }
}

//! Tool definition - schema and metadata for a staff tool.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::telemetry::Section;

/// Definition of a tool the agent can invoke.
///
/// Carries what a function-calling model needs to pick and call the tool,
/// plus the staff section it reports under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    name: String,
    section: Section,
    description: String,
    parameters_schema: Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        section: Section,
        description: impl Into<String>,
        parameters_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            section,
            description: description.into(),
            parameters_schema,
        }
    }

    /// A tool that takes no arguments.
    pub fn nullary(
        name: impl Into<String>,
        section: Section,
        description: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            section,
            description,
            json!({"type": "object", "properties": {}}),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters_schema(&self) -> &Value {
        &self.parameters_schema
    }

    /// Title-cased name for dashboards, e.g. `Check Comms Status`.
    pub fn display_name(&self) -> String {
        self.name
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Converts to OpenAI tool format.
    pub fn to_openai_format(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters_schema
            }
        })
    }
}

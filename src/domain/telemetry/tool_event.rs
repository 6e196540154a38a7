//! Tool telemetry events emitted around every tool invocation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::foundation::Timestamp;

/// Staff section that owns a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    /// Personnel and administration.
    #[serde(rename = "S-1")]
    S1,
    /// Intelligence.
    #[serde(rename = "S-2")]
    S2,
    /// Operations.
    #[serde(rename = "S-3")]
    S3,
    /// Logistics.
    #[serde(rename = "S-4")]
    S4,
}

impl Section {
    /// All sections in staff order.
    pub const ALL: [Section; 4] = [Section::S1, Section::S2, Section::S3, Section::S4];

    /// Wire code, e.g. `S-2`.
    pub fn code(&self) -> &'static str {
        match self {
            Section::S1 => "S-1",
            Section::S2 => "S-2",
            Section::S3 => "S-3",
            Section::S4 => "S-4",
        }
    }

    /// Human-readable staff function.
    pub fn label(&self) -> &'static str {
        match self {
            Section::S1 => "Personnel",
            Section::S2 => "Intelligence",
            Section::S3 => "Operations",
            Section::S4 => "Logistics",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Call boundary a [`ToolEvent`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolPhase {
    Start,
    Complete,
    Error,
}

impl ToolPhase {
    /// Event name on the telemetry channel.
    pub fn event_type(&self) -> &'static str {
        match self {
            ToolPhase::Start => "tool_start",
            ToolPhase::Complete => "tool_complete",
            ToolPhase::Error => "tool_error",
        }
    }
}

/// Truncated per-argument snapshot of a tool call.
pub type ParameterSnapshot = BTreeMap<String, String>;

/// One phase of one tool invocation.
///
/// # Invariants
///
/// - `Start` events carry `parameters` and nothing else optional
/// - `Complete` events carry `result` and `duration_secs`, `success` is true
/// - `Error` events carry `error` and `duration_secs`, `success` is false
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolEvent {
    tool_name: String,
    section: Section,
    phase: ToolPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<ParameterSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(rename = "duration", skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<bool>,
    timestamp: Timestamp,
}

impl ToolEvent {
    /// Event fired before the tool body runs.
    pub fn start(
        tool_name: impl Into<String>,
        section: Section,
        parameters: ParameterSnapshot,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            section,
            phase: ToolPhase::Start,
            parameters: Some(parameters),
            result: None,
            error: None,
            duration_secs: None,
            success: None,
            timestamp: Timestamp::now(),
        }
    }

    /// Event fired after the tool body returned a value.
    pub fn complete(
        tool_name: impl Into<String>,
        section: Section,
        result: serde_json::Value,
        duration_secs: f64,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            section,
            phase: ToolPhase::Complete,
            parameters: None,
            result: Some(result),
            error: None,
            duration_secs: Some(duration_secs.max(0.0)),
            success: Some(true),
            timestamp: Timestamp::now(),
        }
    }

    /// Event fired after the tool body failed.
    pub fn error(
        tool_name: impl Into<String>,
        section: Section,
        error: impl Into<String>,
        duration_secs: f64,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            section,
            phase: ToolPhase::Error,
            parameters: None,
            result: None,
            error: Some(error.into()),
            duration_secs: Some(duration_secs.max(0.0)),
            success: Some(false),
            timestamp: Timestamp::now(),
        }
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn phase(&self) -> ToolPhase {
        self.phase
    }

    pub fn parameters(&self) -> Option<&ParameterSnapshot> {
        self.parameters.as_ref()
    }

    pub fn result(&self) -> Option<&serde_json::Value> {
        self.result.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_secs
    }

    /// `Some(true)` for completes, `Some(false)` for errors, `None` for starts.
    pub fn success(&self) -> Option<bool> {
        self.success
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Event name on the telemetry channel.
    pub fn event_type(&self) -> &'static str {
        self.phase.event_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn section_serializes_with_staff_code() {
        assert_eq!(serde_json::to_string(&Section::S2).unwrap(), "\"S-2\"");
        let parsed: Section = serde_json::from_str("\"S-4\"").unwrap();
        assert_eq!(parsed, Section::S4);
    }

    #[test]
    fn phase_maps_to_event_type() {
        assert_eq!(ToolPhase::Start.event_type(), "tool_start");
        assert_eq!(ToolPhase::Complete.event_type(), "tool_complete");
        assert_eq!(ToolPhase::Error.event_type(), "tool_error");
    }

    #[test]
    fn complete_event_is_successful() {
        let event = ToolEvent::complete("check_comms_status", Section::S3, json!({"ok": 1}), 0.25);
        assert_eq!(event.success(), Some(true));
        assert_eq!(event.duration_secs(), Some(0.25));
        assert!(event.error_message().is_none());
    }

    #[test]
    fn error_event_clamps_negative_duration() {
        let event = ToolEvent::error("check_comms_status", Section::S3, "radio down", -1.0);
        assert_eq!(event.success(), Some(false));
        assert_eq!(event.duration_secs(), Some(0.0));
    }

    #[test]
    fn start_event_serializes_without_outcome_fields() {
        let mut params = ParameterSnapshot::new();
        params.insert("unit".into(), "2/5".into());
        let event = ToolEvent::start("check_unit_readiness", Section::S3, params);

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["tool_name"], "check_unit_readiness");
        assert_eq!(value["section"], "S-3");
        assert_eq!(value["parameters"]["unit"], "2/5");
        assert!(value.get("success").is_none());
        assert!(value.get("duration").is_none());
    }
}

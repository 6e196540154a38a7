//! Events published on the telemetry channel.

use serde::Serialize;

use crate::domain::foundation::{RunId, Timestamp};
use crate::domain::guardrails::GuardrailCategory;
use crate::domain::run::{Run, SessionStats};

use super::{ToolEvent, ToolPhase};

/// Everything the live dashboard can observe, tagged by `type`.
///
/// Emission is fire-and-forget: there is no acknowledgement or backpressure.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    ToolStart(ToolEvent),
    ToolComplete(ToolEvent),
    ToolError(ToolEvent),

    ProcessingStart {
        query: String,
    },
    ProcessingComplete {
        query: String,
        response: String,
    },
    ProcessingError {
        query: String,
        error: String,
    },
    GuardrailTriggered {
        query: String,
        category: GuardrailCategory,
        violation: String,
    },
    HistoryCleared {
        timestamp: Timestamp,
    },

    QueryStatus {
        run_id: RunId,
        status: String,
        query: String,
    },
    QueryResponse {
        run_id: RunId,
        query: String,
        response: String,
        success: bool,
        response_time: f64,
    },
    QueryError {
        run_id: RunId,
        query: String,
        error: String,
    },
    RunSummary(Run),
    StatsUpdate(SessionStats),
}

impl TelemetryEvent {
    /// Wraps a tool event in the variant matching its phase.
    pub fn from_tool(event: ToolEvent) -> Self {
        match event.phase() {
            ToolPhase::Start => TelemetryEvent::ToolStart(event),
            ToolPhase::Complete => TelemetryEvent::ToolComplete(event),
            ToolPhase::Error => TelemetryEvent::ToolError(event),
        }
    }

    /// Value of the `type` tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            TelemetryEvent::ToolStart(_) => "tool_start",
            TelemetryEvent::ToolComplete(_) => "tool_complete",
            TelemetryEvent::ToolError(_) => "tool_error",
            TelemetryEvent::ProcessingStart { .. } => "processing_start",
            TelemetryEvent::ProcessingComplete { .. } => "processing_complete",
            TelemetryEvent::ProcessingError { .. } => "processing_error",
            TelemetryEvent::GuardrailTriggered { .. } => "guardrail_triggered",
            TelemetryEvent::HistoryCleared { .. } => "history_cleared",
            TelemetryEvent::QueryStatus { .. } => "query_status",
            TelemetryEvent::QueryResponse { .. } => "query_response",
            TelemetryEvent::QueryError { .. } => "query_error",
            TelemetryEvent::RunSummary(_) => "run_summary",
            TelemetryEvent::StatsUpdate(_) => "stats_update",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::{ParameterSnapshot, Section};
    use serde_json::json;

    #[test]
    fn tool_events_keep_their_fields_under_the_type_tag() {
        let event = TelemetryEvent::from_tool(ToolEvent::complete(
            "check_vehicle_status",
            Section::S4,
            json!({"operational": 8}),
            0.01,
        ));

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "tool_complete");
        assert_eq!(value["tool_name"], "check_vehicle_status");
        assert_eq!(value["result"]["operational"], 8);
        assert_eq!(value["success"], true);
    }

    #[test]
    fn event_type_matches_serialized_tag() {
        let events = vec![
            TelemetryEvent::from_tool(ToolEvent::start("t", Section::S2, ParameterSnapshot::new())),
            TelemetryEvent::ProcessingStart { query: "q".into() },
            TelemetryEvent::HistoryCleared { timestamp: Timestamp::now() },
            TelemetryEvent::GuardrailTriggered {
                query: "q".into(),
                category: GuardrailCategory::Opsec,
                violation: "v".into(),
            },
            TelemetryEvent::StatsUpdate(SessionStats::default()),
        ];

        for event in events {
            let value = serde_json::to_value(&event).unwrap();
            assert_eq!(value["type"], event.event_type());
        }
    }
}

//! Run record: one top-level query and the tool telemetry it produced.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RunId, Timestamp};
use crate::domain::telemetry::{truncate, ParameterSnapshot, Section, ToolEvent, ToolPhase};

/// Run lifecycle. Closed runs accept no further tool events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Open,
    Closed,
}

/// One tool invocation as seen from the run's audit trail.
///
/// Created by a start event; completed by the matching complete or error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRecord {
    pub tool_name: String,
    pub section: Section,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParameterSnapshot>,
    pub start_ts: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_ts: Option<Timestamp>,
    #[serde(rename = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolRecord {
    fn started(event: &ToolEvent) -> Self {
        Self {
            tool_name: event.tool_name().to_string(),
            section: event.section(),
            parameters: event.parameters().cloned(),
            start_ts: event.timestamp(),
            end_ts: None,
            duration_secs: None,
            result: None,
            error: None,
        }
    }

    /// Error with no open start to attach to.
    fn standalone_error(event: &ToolEvent) -> Self {
        Self {
            tool_name: event.tool_name().to_string(),
            section: event.section(),
            parameters: None,
            start_ts: event.timestamp(),
            end_ts: Some(event.timestamp()),
            duration_secs: event.duration_secs(),
            result: None,
            error: event.error_message().map(str::to_string),
        }
    }

    /// True until a complete or error has been attached.
    pub fn is_pending(&self) -> bool {
        self.duration_secs.is_none()
    }

    pub fn succeeded(&self) -> bool {
        !self.is_pending() && self.error.is_none()
    }
}

/// What [`Run::record`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A start opened a new record.
    Opened,
    /// A complete or error closed the latest pending record of that tool.
    Matched,
    /// An error with no pending start was kept as its own record.
    Standalone,
    /// A complete with no pending start was dropped.
    Dropped,
    /// The run was already closed.
    Rejected,
}

/// One top-level query from dispatch to response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    run_id: RunId,
    query: String,
    status: RunStatus,
    start_time: Timestamp,
    end_time: Option<Timestamp>,
    tools: Vec<ToolRecord>,
    response_preview: Option<String>,
    response_time: Option<f64>,
    success: Option<bool>,
}

impl Run {
    pub fn open(run_id: RunId, query: impl Into<String>) -> Self {
        Self {
            run_id,
            query: query.into(),
            status: RunStatus::Open,
            start_time: Timestamp::now(),
            end_time: None,
            tools: Vec::new(),
            response_preview: None,
            response_time: None,
            success: None,
        }
    }

    /// Applies one tool event in call order.
    ///
    /// Completes and errors attach to the most recent pending record with
    /// the same tool name.
    pub fn record(&mut self, event: &ToolEvent) -> RecordOutcome {
        if self.status == RunStatus::Closed {
            return RecordOutcome::Rejected;
        }

        match event.phase() {
            ToolPhase::Start => {
                self.tools.push(ToolRecord::started(event));
                RecordOutcome::Opened
            }
            ToolPhase::Complete | ToolPhase::Error => {
                let pending = self.tools.iter().rposition(|record| {
                    record.tool_name == event.tool_name() && record.is_pending()
                });

                match pending {
                    Some(idx) => {
                        let record = &mut self.tools[idx];
                        record.end_ts = Some(event.timestamp());
                        record.duration_secs = Some(event.duration_secs().unwrap_or(0.0));
                        record.result = event.result().cloned();
                        record.error = event.error_message().map(str::to_string);
                        RecordOutcome::Matched
                    }
                    None if event.phase() == ToolPhase::Error => {
                        self.tools.push(ToolRecord::standalone_error(event));
                        RecordOutcome::Standalone
                    }
                    None => RecordOutcome::Dropped,
                }
            }
        }
    }

    /// Attaches the summary and moves the run to `Closed`.
    ///
    /// Closing twice keeps the first summary.
    pub fn close(
        &mut self,
        response: &str,
        success: bool,
        response_time: f64,
        preview_chars: usize,
    ) {
        if self.status == RunStatus::Closed {
            return;
        }
        self.status = RunStatus::Closed;
        self.end_time = Some(Timestamp::now());
        self.response_preview = Some(truncate(response, preview_chars));
        self.response_time = Some(response_time.max(0.0));
        self.success = Some(success);
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn is_closed(&self) -> bool {
        self.status == RunStatus::Closed
    }

    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    pub fn end_time(&self) -> Option<Timestamp> {
        self.end_time
    }

    pub fn tools(&self) -> &[ToolRecord] {
        &self.tools
    }

    pub fn response_preview(&self) -> Option<&str> {
        self.response_preview.as_deref()
    }

    pub fn response_time(&self) -> Option<f64> {
        self.response_time
    }

    pub fn success(&self) -> Option<bool> {
        self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn start(name: &str) -> ToolEvent {
        ToolEvent::start(name, Section::S2, ParameterSnapshot::new())
    }

    fn complete(name: &str, marker: i64) -> ToolEvent {
        ToolEvent::complete(name, Section::S2, json!({ "marker": marker }), 0.1)
    }

    #[test]
    fn complete_matches_latest_pending_start_of_same_tool() {
        let mut run = Run::open(RunId::new(), "q");
        run.record(&start("weather"));
        run.record(&start("weather"));
        run.record(&start("terrain"));

        assert_eq!(run.record(&complete("weather", 2)), RecordOutcome::Matched);
        assert_eq!(run.record(&complete("weather", 1)), RecordOutcome::Matched);

        let tools = run.tools();
        assert_eq!(tools[1].result.as_ref().unwrap()["marker"], 2);
        assert_eq!(tools[0].result.as_ref().unwrap()["marker"], 1);
        assert!(tools[2].is_pending());
    }

    #[test]
    fn unmatched_complete_is_dropped() {
        let mut run = Run::open(RunId::new(), "q");
        assert_eq!(run.record(&complete("weather", 1)), RecordOutcome::Dropped);
        assert!(run.tools().is_empty());
    }

    #[test]
    fn error_matches_pending_start() {
        let mut run = Run::open(RunId::new(), "q");
        run.record(&start("supply"));
        let outcome = run.record(&ToolEvent::error("supply", Section::S4, "boom", 0.2));

        assert_eq!(outcome, RecordOutcome::Matched);
        assert_eq!(run.tools().len(), 1);
        assert_eq!(run.tools()[0].error.as_deref(), Some("boom"));
        assert!(!run.tools()[0].succeeded());
    }

    #[test]
    fn unmatched_error_is_kept_standalone() {
        let mut run = Run::open(RunId::new(), "q");
        let outcome = run.record(&ToolEvent::error("supply", Section::S4, "boom", 0.2));

        assert_eq!(outcome, RecordOutcome::Standalone);
        assert_eq!(run.tools()[0].duration_secs, Some(0.2));
    }

    #[test]
    fn closed_run_rejects_events_and_keeps_first_summary() {
        let mut run = Run::open(RunId::new(), "q");
        run.close("first response", true, 1.5, 5);
        run.close("second", false, 9.0, 400);

        assert!(run.is_closed());
        assert_eq!(run.response_preview(), Some("first"));
        assert_eq!(run.response_time(), Some(1.5));
        assert_eq!(run.success(), Some(true));
        assert_eq!(run.record(&start("weather")), RecordOutcome::Rejected);
    }

    #[test]
    fn run_serializes_audit_fields() {
        let mut run = Run::open(RunId::new(), "weather?");
        run.record(&start("weather"));
        run.record(&complete("weather", 1));
        run.close("Clear skies", true, 0.5, 400);

        let value = serde_json::to_value(&run).unwrap();
        assert_eq!(value["query"], "weather?");
        assert_eq!(value["status"], "CLOSED");
        assert_eq!(value["tools"][0]["tool_name"], "weather");
        assert_eq!(value["tools"][0]["duration"], 0.1);
        assert_eq!(value["response_preview"], "Clear skies");
    }
}

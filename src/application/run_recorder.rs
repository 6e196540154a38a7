//! Tool observer that feeds the run registry, statistics and telemetry sink.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::run::{current_run, RecordOutcome, RunRegistry, StatsTracker};
use crate::domain::telemetry::{TelemetryEvent, ToolEvent, ToolObserver, ToolPhase};
use crate::ports::TelemetrySink;

/// Attributes tool events to the run bound to the calling task.
///
/// Every event is published to the sink whether or not a run is bound;
/// only attribution to a run record depends on the binding.
pub struct RunRecorder {
    registry: Arc<RunRegistry>,
    stats: Arc<StatsTracker>,
    sink: Arc<dyn TelemetrySink>,
}

impl RunRecorder {
    pub fn new(
        registry: Arc<RunRegistry>,
        stats: Arc<StatsTracker>,
        sink: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            registry,
            stats,
            sink,
        }
    }
}

impl ToolObserver for RunRecorder {
    fn on_tool_event(&self, event: &ToolEvent) {
        if event.phase() == ToolPhase::Start {
            self.stats.record_tool_start(event.section());
        }

        match current_run() {
            Some(run_id) => match self.registry.record(run_id, event) {
                Some(RecordOutcome::Dropped) => debug!(
                    run_id = %run_id,
                    tool_name = event.tool_name(),
                    "Dropped completion with no pending start"
                ),
                Some(RecordOutcome::Rejected) => warn!(
                    run_id = %run_id,
                    tool_name = event.tool_name(),
                    "Tool event arrived after run closed"
                ),
                Some(outcome) => debug!(
                    run_id = %run_id,
                    tool_name = event.tool_name(),
                    section = %event.section(),
                    phase = ?event.phase(),
                    duration_secs = event.duration_secs(),
                    ?outcome,
                    "Recorded tool event"
                ),
                None => warn!(
                    run_id = %run_id,
                    tool_name = event.tool_name(),
                    "Tool event for unknown run"
                ),
            },
            None => debug!(
                tool_name = event.tool_name(),
                "Tool event outside any run, not attributed"
            ),
        }

        self.sink.publish(TelemetryEvent::from_tool(event.clone()));
    }
}

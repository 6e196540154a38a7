//! DispatchQuery command handler - the run lifecycle.
//!
//! Each dispatched query gets a fresh run id, an open run in the registry
//! and its own tokio task. The run id is bound task-locally around the
//! handler future, so every tool event emitted while that task works is
//! attributed to this run and to no other. The binding ends with the
//! future; nothing is left behind on the worker thread.
//!
//! Closing the run happens on the spawned lifecycle task, not in the
//! caller. A caller that stops waiting (an HTTP timeout, a dropped
//! connection) leaves the query running, and its run is still closed and
//! summarised when the query finishes.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::task::JoinError;
use tracing::{error, info, Instrument};

use crate::domain::foundation::RunId;
use crate::domain::run::{with_run, Run, RunRegistry, StatsTracker};
use crate::domain::telemetry::TelemetryEvent;
use crate::ports::TelemetrySink;

use super::process_frago::{ProcessFragoCommand, ProcessFragoHandler};
use super::process_query::{ProcessQueryCommand, ProcessQueryHandler, QueryOutcome};

/// Default response preview length kept on a closed run.
pub const DEFAULT_PREVIEW_CHARS: usize = 400;

/// What to dispatch.
#[derive(Debug, Clone)]
pub enum DispatchCommand {
    Query(String),
    Frago(String),
}

impl DispatchCommand {
    /// Text the run is filed under.
    pub fn text(&self) -> &str {
        match self {
            DispatchCommand::Query(text) | DispatchCommand::Frago(text) => text,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    pub run_id: RunId,
    pub outcome: QueryOutcome,
    /// Wall-clock seconds from dispatch to outcome.
    pub response_time: f64,
    /// Closed run, when still retained.
    pub run: Option<Run>,
}

/// Handler that owns a query's run from open to summary.
pub struct DispatchQueryHandler {
    query_handler: Arc<ProcessQueryHandler>,
    frago_handler: Arc<ProcessFragoHandler>,
    lifecycle: RunLifecycle,
}

impl DispatchQueryHandler {
    pub fn new(
        query_handler: Arc<ProcessQueryHandler>,
        frago_handler: Arc<ProcessFragoHandler>,
        registry: Arc<RunRegistry>,
        stats: Arc<StatsTracker>,
        sink: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            query_handler,
            frago_handler,
            lifecycle: RunLifecycle {
                registry,
                stats,
                sink,
                preview_chars: DEFAULT_PREVIEW_CHARS,
            },
        }
    }

    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.lifecycle.preview_chars = preview_chars;
        self
    }

    #[tracing::instrument(name = "dispatch_query", skip_all, fields(run_id))]
    pub async fn handle(&self, cmd: DispatchCommand) -> DispatchResult {
        let query = cmd.text().to_string();
        let started = Instant::now();

        // 1. Open the run
        let run_id = RunId::new();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));
        self.lifecycle.open(run_id, &query);

        // 2. Process and close on a detached task with the run bound
        let task = {
            let query_handler = self.query_handler.clone();
            let frago_handler = self.frago_handler.clone();
            let lifecycle = self.lifecycle.clone();
            let query = query.clone();
            tokio::spawn(
                async move {
                    let worker = tokio::spawn(with_run(run_id, async move {
                        match cmd {
                            DispatchCommand::Query(query) => {
                                query_handler.handle(ProcessQueryCommand::new(query)).await
                            }
                            DispatchCommand::Frago(text) => {
                                frago_handler.handle(ProcessFragoCommand::new(text)).await
                            }
                        }
                    }));
                    let outcome = match worker.await {
                        Ok(outcome) => outcome,
                        Err(join_err) => lifecycle.worker_failed(run_id, &query, join_err),
                    };
                    lifecycle.close(run_id, query, outcome, started)
                }
                .instrument(tracing::Span::current()),
            )
        };

        // 3. Wait for the summary
        match task.await {
            Ok(result) => result,
            Err(join_err) => {
                let outcome = self.lifecycle.worker_failed(run_id, &query, join_err);
                self.lifecycle.close(run_id, query, outcome, started)
            }
        }
    }
}

/// Open, close and summary steps shared by the caller and the lifecycle task.
#[derive(Clone)]
struct RunLifecycle {
    registry: Arc<RunRegistry>,
    stats: Arc<StatsTracker>,
    sink: Arc<dyn TelemetrySink>,
    preview_chars: usize,
}

impl RunLifecycle {
    fn open(&self, run_id: RunId, query: &str) {
        self.stats.mark_session_start();
        self.registry.open(run_id, query);
        self.sink.publish(TelemetryEvent::QueryStatus {
            run_id,
            status: "processing".to_string(),
            query: query.to_string(),
        });
        info!(%run_id, "Run opened");
    }

    fn worker_failed(&self, run_id: RunId, query: &str, join_err: JoinError) -> QueryOutcome {
        error!(%run_id, error = %join_err, "Query worker failed");
        self.sink.publish(TelemetryEvent::QueryError {
            run_id,
            query: query.to_string(),
            error: join_err.to_string(),
        });
        QueryOutcome::failed("Error processing query", join_err.to_string())
    }

    fn close(
        &self,
        run_id: RunId,
        query: String,
        outcome: QueryOutcome,
        started: Instant,
    ) -> DispatchResult {
        let response_time = started.elapsed().as_secs_f64();
        let run = self.registry.close(
            run_id,
            outcome.response(),
            outcome.is_success(),
            response_time,
            self.preview_chars,
        );
        let stats = self.stats.record_query(response_time);

        info!(
            %run_id,
            success = outcome.is_success(),
            response_time,
            tools = run.as_ref().map_or(0, |r| r.tools().len()),
            "Run closed"
        );

        self.sink.publish(TelemetryEvent::QueryResponse {
            run_id,
            query,
            response: outcome.response().to_string(),
            success: outcome.is_success(),
            response_time,
        });
        self.sink.publish(TelemetryEvent::StatsUpdate(stats));
        if let Some(run) = &run {
            self.sink.publish(TelemetryEvent::RunSummary(run.clone()));
        }

        DispatchResult {
            run_id,
            outcome,
            response_time,
            run,
        }
    }
}

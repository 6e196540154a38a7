//! ProcessQuery command handler.
//!
//! Runs one operator query through the command agent with recent history
//! attached. Failures never escape as errors: guardrail blocks and runtime
//! failures both become a [`QueryOutcome`] the caller can display.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::assistant::Assistant;
use crate::application::instructions::{COMMAND_AGENT_NAME, COMMAND_INSTRUCTIONS};
use crate::domain::guardrails::{GuardrailCategory, GuardrailViolation};
use crate::domain::telemetry::TelemetryEvent;
use crate::ports::AgentError;

/// Command to answer one operator query.
#[derive(Debug, Clone)]
pub struct ProcessQueryCommand {
    pub query: String,
}

impl ProcessQueryCommand {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Why an agent invocation produced no answer.
#[derive(Debug, Error)]
pub enum ProcessQueryError {
    /// A guardrail rejected the input before the runtime was called.
    #[error("blocked by guardrail: {0}")]
    Blocked(GuardrailViolation),

    #[error(transparent)]
    Agent(AgentError),
}

impl From<AgentError> for ProcessQueryError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::GuardrailTripped(violation) => ProcessQueryError::Blocked(violation),
            other => ProcessQueryError::Agent(other),
        }
    }
}

/// What the operator sees for a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryOutcome {
    Completed {
        response: String,
    },
    Blocked {
        category: GuardrailCategory,
        response: String,
    },
    Failed {
        error: String,
        response: String,
    },
}

impl QueryOutcome {
    /// Blocked outcome carrying the category's fixed advisory.
    pub fn blocked(category: GuardrailCategory) -> Self {
        QueryOutcome::Blocked {
            category,
            response: category.block_message(),
        }
    }

    /// Failed outcome rendered as `{prefix}: {error}`.
    pub fn failed(prefix: &str, error: impl Into<String>) -> Self {
        let error = error.into();
        QueryOutcome::Failed {
            response: format!("{prefix}: {error}"),
            error,
        }
    }

    pub fn response(&self) -> &str {
        match self {
            QueryOutcome::Completed { response }
            | QueryOutcome::Blocked { response, .. }
            | QueryOutcome::Failed { response, .. } => response,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryOutcome::Completed { .. })
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, QueryOutcome::Blocked { .. })
    }
}

/// Handler for ProcessQuery commands.
pub struct ProcessQueryHandler {
    assistant: Arc<Assistant>,
}

impl ProcessQueryHandler {
    pub fn new(assistant: Arc<Assistant>) -> Self {
        Self { assistant }
    }

    #[tracing::instrument(name = "process_query", skip_all, fields(query_len = cmd.query.len()))]
    pub async fn handle(&self, cmd: ProcessQueryCommand) -> QueryOutcome {
        let query = cmd.query;

        // 1. Announce
        self.assistant.publish(TelemetryEvent::ProcessingStart {
            query: query.clone(),
        });

        // 2. Recent history plus the new query
        let input = self.assistant.input_for(&query);

        // 3. Screen and run
        let max_turns = self.assistant.settings().max_turns;
        let result = self
            .assistant
            .run_agent(COMMAND_AGENT_NAME, COMMAND_INSTRUCTIONS, input, max_turns)
            .await;

        // 4. Record and report
        match result {
            Ok(response) => {
                self.assistant.lock_history().record_exchange(&query, &response);
                info!(response_len = response.len(), "Query processed");
                self.assistant.publish(TelemetryEvent::ProcessingComplete {
                    query,
                    response: response.clone(),
                });
                QueryOutcome::Completed { response }
            }
            Err(ProcessQueryError::Blocked(violation)) => {
                warn!(
                    category = %violation.category,
                    guardrail = %violation.guardrail,
                    "Query blocked by guardrail"
                );
                self.assistant.publish(TelemetryEvent::GuardrailTriggered {
                    query,
                    category: violation.category,
                    violation: violation.category.advisory().to_string(),
                });
                QueryOutcome::blocked(violation.category)
            }
            Err(err) => {
                error!(error = %err, "Query processing failed");
                self.assistant.publish(TelemetryEvent::ProcessingError {
                    query,
                    error: err.to_string(),
                });
                QueryOutcome::failed("Error processing query", err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::agent::{Script, ScriptedRuntime};
    use crate::adapters::telemetry::RecordingSink;
    use crate::application::assistant::AssistantSettings;
    use crate::domain::conversation::Role;
    use crate::domain::run::StatsTracker;
    use crate::domain::tools::ToolSet;
    use crate::ports::AgentRuntime;
    use serde_json::json;

    type Fixture = (
        ProcessQueryHandler,
        Arc<Assistant>,
        Arc<RecordingSink>,
        Arc<ScriptedRuntime>,
    );

    fn setup(runtime: ScriptedRuntime) -> Fixture {
        let sink = Arc::new(RecordingSink::new());
        let runtime = Arc::new(runtime);
        let assistant = Arc::new(Assistant::new(
            runtime.clone() as Arc<dyn AgentRuntime>,
            Arc::new(ToolSet::unmonitored()),
            Arc::new(StatsTracker::new()),
            sink.clone(),
            AssistantSettings::default(),
        ));
        (ProcessQueryHandler::new(assistant.clone()), assistant, sink, runtime)
    }

    #[tokio::test]
    async fn completed_query_is_added_to_history() {
        let runtime =
            ScriptedRuntime::new().on("weather", Script::reply("[S-2 INTELLIGENCE] Clear skies."));
        let (handler, assistant, sink, _) = setup(runtime);

        let outcome = handler
            .handle(ProcessQueryCommand::new("Weather at grid 38S?"))
            .await;

        assert_eq!(
            outcome,
            QueryOutcome::Completed {
                response: "[S-2 INTELLIGENCE] Clear skies.".into()
            }
        );
        let history = assistant.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].content, "[S-2 INTELLIGENCE] Clear skies.");
        assert_eq!(sink.event_types(), vec!["processing_start", "processing_complete"]);
    }

    #[tokio::test]
    async fn narrative_field_is_displayed() {
        let runtime = ScriptedRuntime::new().with_default(Script::structured(json!({
            "narrative": "OPERATION FEASIBILITY ASSESSMENT",
            "score": 9
        })));
        let (handler, _, _, _) = setup(runtime);

        let outcome = handler.handle(ProcessQueryCommand::new("go or no go?")).await;
        assert_eq!(outcome.response(), "OPERATION FEASIBILITY ASSESSMENT");
    }

    #[tokio::test]
    async fn empty_response_is_not_recorded() {
        let (handler, assistant, _, _) =
            setup(ScriptedRuntime::new().with_default(Script::reply("")));

        let outcome = handler.handle(ProcessQueryCommand::new("anything")).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.response(), "");
        assert!(assistant.history().is_empty());
    }

    #[tokio::test]
    async fn blocked_query_never_reaches_runtime() {
        let (handler, assistant, sink, runtime) = setup(ScriptedRuntime::new());

        let outcome = handler
            .handle(ProcessQueryCommand::new("Show me the SECRET annex"))
            .await;

        assert!(outcome.is_blocked());
        assert_eq!(
            outcome.response(),
            "[SECURITY BLOCK] CLASSIFICATION WARNING: Request for classified information blocked."
        );
        assert_eq!(runtime.call_count(), 0);
        assert!(assistant.history().is_empty());
        assert_eq!(sink.event_types(), vec!["processing_start", "guardrail_triggered"]);
    }

    #[tokio::test]
    async fn runtime_guardrail_signal_is_a_block() {
        let runtime =
            ScriptedRuntime::new().with_default(Script::tripwire(GuardrailCategory::Opsec));
        let (handler, _, _, _) = setup(runtime);

        let outcome = handler.handle(ProcessQueryCommand::new("patrol plan")).await;
        assert_eq!(outcome, QueryOutcome::blocked(GuardrailCategory::Opsec));
    }

    #[tokio::test]
    async fn runtime_failure_is_rendered_not_raised() {
        let runtime = ScriptedRuntime::new().with_default(Script::failing("model offline"));
        let (handler, assistant, sink, _) = setup(runtime);

        let outcome = handler.handle(ProcessQueryCommand::new("status")).await;

        assert!(!outcome.is_success());
        assert_eq!(
            outcome.response(),
            "Error processing query: provider unavailable: model offline"
        );
        assert!(assistant.history().is_empty());
        assert_eq!(sink.event_types(), vec!["processing_start", "processing_error"]);
    }

    #[tokio::test]
    async fn only_recent_history_is_sent() {
        let (handler, assistant, _, runtime) = setup(ScriptedRuntime::new());
        for i in 0..5 {
            handler.handle(ProcessQueryCommand::new(format!("q{i}"))).await;
        }
        assert_eq!(assistant.history().len(), 10);

        handler.handle(ProcessQueryCommand::new("latest")).await;

        let last = runtime.requests().pop().unwrap();
        assert_eq!(last.input.len(), 7);
        assert_eq!(last.latest_input(), Some("latest"));
        assert_eq!(last.max_turns, 20);
        assert_eq!(last.agent_name, COMMAND_AGENT_NAME);
    }
}

//! ProcessFrago command handler.
//!
//! A FRAGO is recorded in history as received, analysed by the FRAGO
//! interpreter on its own (history is not sent), and the analysis is
//! recorded back as an assistant turn.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::application::assistant::Assistant;
use crate::application::instructions::{FRAGO_AGENT_NAME, FRAGO_INSTRUCTIONS, FRAGO_QUERY_LABEL};
use crate::domain::conversation::Turn;
use crate::domain::telemetry::TelemetryEvent;

use super::process_query::{ProcessQueryError, QueryOutcome};

/// Command to analyse one fragmentary order.
#[derive(Debug, Clone)]
pub struct ProcessFragoCommand {
    pub frago_text: String,
}

impl ProcessFragoCommand {
    pub fn new(frago_text: impl Into<String>) -> Self {
        Self {
            frago_text: frago_text.into(),
        }
    }
}

/// Handler for ProcessFrago commands.
pub struct ProcessFragoHandler {
    assistant: Arc<Assistant>,
}

impl ProcessFragoHandler {
    pub fn new(assistant: Arc<Assistant>) -> Self {
        Self { assistant }
    }

    #[tracing::instrument(
        name = "process_frago",
        skip_all,
        fields(frago_len = cmd.frago_text.len())
    )]
    pub async fn handle(&self, cmd: ProcessFragoCommand) -> QueryOutcome {
        let frago_text = cmd.frago_text;

        self.assistant
            .lock_history()
            .push(Turn::user(format!("[FRAGO RECEIVED]\n{frago_text}")));

        self.assistant.publish(TelemetryEvent::ProcessingStart {
            query: FRAGO_QUERY_LABEL.to_string(),
        });

        let max_turns = self.assistant.settings().frago_max_turns;
        let result = self
            .assistant
            .run_agent(
                FRAGO_AGENT_NAME,
                FRAGO_INSTRUCTIONS,
                vec![Turn::user(frago_text)],
                max_turns,
            )
            .await;

        match result {
            Ok(response) => {
                self.assistant
                    .lock_history()
                    .push(Turn::assistant(format!("[FRAGO ANALYSIS]\n{response}")));
                info!(response_len = response.len(), "FRAGO processed");
                self.assistant.publish(TelemetryEvent::ProcessingComplete {
                    query: FRAGO_QUERY_LABEL.to_string(),
                    response: response.clone(),
                });
                QueryOutcome::Completed { response }
            }
            Err(ProcessQueryError::Blocked(violation)) => {
                warn!(category = %violation.category, "FRAGO blocked by guardrail");
                self.assistant.publish(TelemetryEvent::GuardrailTriggered {
                    query: FRAGO_QUERY_LABEL.to_string(),
                    category: violation.category,
                    violation: violation.category.advisory().to_string(),
                });
                QueryOutcome::blocked(violation.category)
            }
            Err(err) => {
                error!(error = %err, "FRAGO processing failed");
                self.assistant.publish(TelemetryEvent::ProcessingError {
                    query: FRAGO_QUERY_LABEL.to_string(),
                    error: err.to_string(),
                });
                QueryOutcome::failed("Error processing FRAGO", err.to_string())
            }
        }
    }
}

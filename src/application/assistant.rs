//! Shared state of the operations assistant.
//!
//! One [`Assistant`] exists per process. The command handlers share it
//! through an `Arc`: conversation history, the tool set, the guardrail
//! pipeline and the session statistics all live here.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::domain::conversation::{
    ConversationHistory, Turn, DEFAULT_HISTORY_CAPACITY, DEFAULT_HISTORY_WINDOW,
};
use crate::domain::guardrails::GuardrailPipeline;
use crate::domain::run::StatsTracker;
use crate::domain::telemetry::TelemetryEvent;
use crate::domain::tools::ToolSet;
use crate::ports::{AgentRequest, AgentRuntime, RuntimeInfo, TelemetrySink, DEFAULT_MAX_TURNS};

use super::handlers::ProcessQueryError;

/// Model-turn budget for FRAGO processing.
pub const DEFAULT_FRAGO_MAX_TURNS: u32 = 25;

/// Tunables for agent invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssistantSettings {
    /// Prior turns sent with each query.
    pub history_limit: usize,
    /// Turns retained in the conversation history.
    pub history_capacity: usize,
    pub max_turns: u32,
    pub frago_max_turns: u32,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_WINDOW,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_turns: DEFAULT_MAX_TURNS,
            frago_max_turns: DEFAULT_FRAGO_MAX_TURNS,
        }
    }
}

pub struct Assistant {
    runtime: Arc<dyn AgentRuntime>,
    tools: Arc<ToolSet>,
    guardrails: GuardrailPipeline,
    history: Mutex<ConversationHistory>,
    stats: Arc<StatsTracker>,
    sink: Arc<dyn TelemetrySink>,
    settings: AssistantSettings,
}

impl Assistant {
    /// Creates an assistant with the security guardrails installed.
    pub fn new(
        runtime: Arc<dyn AgentRuntime>,
        tools: Arc<ToolSet>,
        stats: Arc<StatsTracker>,
        sink: Arc<dyn TelemetrySink>,
        settings: AssistantSettings,
    ) -> Self {
        Self {
            runtime,
            tools,
            guardrails: GuardrailPipeline::security_defaults(),
            history: Mutex::new(ConversationHistory::with_capacity(settings.history_capacity)),
            stats,
            sink,
            settings,
        }
    }

    pub fn with_guardrails(mut self, guardrails: GuardrailPipeline) -> Self {
        self.guardrails = guardrails;
        self
    }

    pub fn settings(&self) -> AssistantSettings {
        self.settings
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    pub fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    pub fn runtime_info(&self) -> RuntimeInfo {
        self.runtime.runtime_info()
    }

    pub fn publish(&self, event: TelemetryEvent) {
        self.sink.publish(event);
    }

    /// Copy of the conversation so far.
    pub fn history(&self) -> Vec<Turn> {
        self.lock_history().turns().to_vec()
    }

    pub(crate) fn lock_history(&self) -> MutexGuard<'_, ConversationHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Recent history followed by `query`, as agent input.
    pub(crate) fn input_for(&self, query: &str) -> Vec<Turn> {
        self.lock_history().input_for(query, self.settings.history_limit)
    }

    /// Screens `input` and runs the agent, returning display text.
    ///
    /// Guardrails run before the runtime is called, so a blocked query
    /// never reaches a tool.
    pub(crate) async fn run_agent(
        &self,
        agent_name: &str,
        instructions: &str,
        input: Vec<Turn>,
        max_turns: u32,
    ) -> Result<String, ProcessQueryError> {
        self.guardrails
            .check_turns(&input)
            .map_err(ProcessQueryError::Blocked)?;

        debug!(
            agent = agent_name,
            turns = input.len(),
            max_turns,
            "Invoking agent runtime"
        );

        let request = AgentRequest::new(agent_name, instructions, input).with_max_turns(max_turns);
        let output = self.runtime.run(request, &self.tools).await?;
        Ok(output.into_display_text())
    }
}

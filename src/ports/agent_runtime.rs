//! Agent Runtime Port - the consumed LLM agent contract.
//!
//! An agent runtime takes role-tagged conversation turns plus the staff tool
//! set and drives the model until it produces a final output, invoking tools
//! along the way. Each tool call goes through [`ToolSet::invoke`], so
//! telemetry and run attribution happen without the runtime knowing.
//!
//! # Example
//!
//! ```ignore
//! let request = AgentRequest::new("S-3 Operations Assistant", instructions, turns)
//!     .with_max_turns(20);
//! let output = runtime.run(request, &tools).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::{AgentOutput, Turn};
use crate::domain::guardrails::GuardrailViolation;
use crate::domain::tools::{ToolError, ToolSet};

/// Default model-turn budget for one query.
pub const DEFAULT_MAX_TURNS: u32 = 20;

/// Port for running an LLM agent with the staff tool set attached.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Runs the agent to completion.
    ///
    /// Tool calls must be made through `tools` on the calling task so their
    /// telemetry is attributed to the bound run.
    async fn run(&self, request: AgentRequest, tools: &ToolSet) -> Result<AgentOutput, AgentError>;

    /// Runtime name and model, for logs and the dashboard.
    fn runtime_info(&self) -> RuntimeInfo;
}

/// One agent invocation.
#[derive(Debug, Clone)]
pub struct AgentRequest {
    pub agent_name: String,
    pub instructions: String,
    /// Conversation turns, oldest first, ending with the new query.
    pub input: Vec<Turn>,
    /// Maximum model turns (each tool-call round trip is one turn).
    pub max_turns: u32,
}

impl AgentRequest {
    pub fn new(
        agent_name: impl Into<String>,
        instructions: impl Into<String>,
        input: Vec<Turn>,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            instructions: instructions.into(),
            input,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Content of the newest turn.
    pub fn latest_input(&self) -> Option<&str> {
        self.input.last().map(|turn| turn.content.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    pub name: String,
    pub model: String,
}

impl RuntimeInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Agent runtime errors.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// An input guardrail tripped before any tool ran.
    #[error("guardrail tripped: {0}")]
    GuardrailTripped(GuardrailViolation),

    /// The model kept calling tools past the turn budget.
    #[error("max turns ({max_turns}) exceeded")]
    MaxTurnsExceeded { max_turns: u32 },

    /// A tool failure the runtime chose not to hand back to the model.
    #[error("tool failed: {0}")]
    Tool(#[from] ToolError),

    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    /// The provider rejected the request as malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl AgentError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Whether a provider call that failed this way is worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::Unavailable { .. }
                | Self::Network(_)
                | Self::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::guardrails::GuardrailCategory;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn AgentRuntime) {}

    #[test]
    fn request_defaults_to_twenty_turns() {
        let request = AgentRequest::new("ops", "be brief", vec![Turn::user("status?")]);
        assert_eq!(request.max_turns, 20);
        assert_eq!(request.latest_input(), Some("status?"));
        assert_eq!(request.with_max_turns(25).max_turns, 25);
    }

    #[test]
    fn transient_errors_are_retryable() {
        assert!(AgentError::Network("reset".into()).is_retryable());
        assert!(AgentError::RateLimited { retry_after_secs: 1 }.is_retryable());
        assert!(!AgentError::AuthenticationFailed.is_retryable());
        assert!(!AgentError::MaxTurnsExceeded { max_turns: 20 }.is_retryable());
    }

    #[test]
    fn guardrail_error_names_category() {
        let violation = GuardrailViolation::new(GuardrailCategory::Opsec, "opsec", "real world");
        let err = AgentError::GuardrailTripped(violation);
        assert!(err.to_string().contains("guardrail tripped"));
    }
}

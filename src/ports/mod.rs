//! Ports - async trait seams between the application and its adapters.
//!
//! - [`AgentRuntime`] is the consumed LLM agent contract.
//! - [`TelemetrySink`] is the exposed live event channel.

mod agent_runtime;
mod telemetry_sink;

pub use agent_runtime::{AgentError, AgentRequest, AgentRuntime, RuntimeInfo, DEFAULT_MAX_TURNS};
pub use telemetry_sink::{DiscardSink, TelemetrySink};

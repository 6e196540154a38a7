//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the assistant to the outside world:
//! - `agent` - agent runtimes (scripted, OpenAI-compatible)
//! - `telemetry` - telemetry sinks (broadcast, recording)
//! - `http` - REST API and application router
//! - `websocket` - live telemetry feed

pub mod agent;
pub mod http;
pub mod telemetry;
pub mod websocket;

pub use agent::{OpenAIRuntime, OpenAIRuntimeConfig, Script, ScriptedRuntime};
pub use http::{app_router, DashboardAppState};
pub use telemetry::{BroadcastSink, RecordingSink};

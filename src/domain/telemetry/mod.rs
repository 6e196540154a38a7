//! Tool telemetry: the events produced around each tool call, the observer
//! seam that receives them, and the wrapper that emits them.
//!
//! Lifecycle events for whole queries live in [`TelemetryEvent`].

mod event;
mod monitor;
mod observer;
mod tool_event;

pub use event::TelemetryEvent;
pub use monitor::{
    snapshot_parameters, snapshot_result, truncate, ToolMonitor, PARAMETER_PREVIEW_CHARS,
    RESULT_PREVIEW_CHARS,
};
pub use observer::{NoopObserver, ToolObserver};
pub use tool_event::{ParameterSnapshot, Section, ToolEvent, ToolPhase};

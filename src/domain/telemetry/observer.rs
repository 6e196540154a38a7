//! Observer seam between the tool set and whatever consumes tool telemetry.

use super::ToolEvent;

/// Receives every tool event produced by a [`ToolMonitor`](super::ToolMonitor).
///
/// Injected into the tool set at construction. Implementations run inline on
/// the calling task, so they should be quick and must not block on I/O.
/// A panicking observer propagates into the tool call.
pub trait ToolObserver: Send + Sync {
    fn on_tool_event(&self, event: &ToolEvent);
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ToolObserver for NoopObserver {
    fn on_tool_event(&self, _event: &ToolEvent) {}
}

impl<F> ToolObserver for F
where
    F: Fn(&ToolEvent) + Send + Sync,
{
    fn on_tool_event(&self, event: &ToolEvent) {
        self(event)
    }
}

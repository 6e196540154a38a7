//! Broadcast telemetry sink feeding live WebSocket subscribers.
//!
//! Built on `tokio::sync::broadcast`: publishing never waits, and a
//! subscriber that falls behind the channel capacity skips the events it
//! missed rather than slowing anyone down.

use tokio::sync::broadcast;
use tracing::trace;

use crate::domain::telemetry::TelemetryEvent;
use crate::ports::TelemetrySink;

/// Default number of events buffered per subscriber.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Fire-and-forget fan-out of telemetry events.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    sender: broadcast::Sender<TelemetryEvent>,
}

impl Default for BroadcastSink {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl BroadcastSink {
    /// Creates a sink buffering up to `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// New receiver seeing every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<TelemetryEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl TelemetrySink for BroadcastSink {
    fn publish(&self, event: TelemetryEvent) {
        let event_type = event.event_type();
        if self.sender.send(event).is_err() {
            trace!(event_type, "No live subscribers, event discarded");
        }
    }
}

//! Telemetry Sink Port - the exposed fire-and-forget event channel.
//!
//! The delivery surface subscribes to these events to drive a live view.
//! Publishing never blocks and never fails from the caller's point of
//! view: there is no acknowledgement and no backpressure.

use crate::domain::telemetry::TelemetryEvent;

/// Port for publishing telemetry events.
pub trait TelemetrySink: Send + Sync {
    fn publish(&self, event: TelemetryEvent);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl TelemetrySink for DiscardSink {
    fn publish(&self, _event: TelemetryEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn TelemetrySink) {}

    #[test]
    fn discard_sink_accepts_events() {
        DiscardSink.publish(TelemetryEvent::HistoryCleared {
            timestamp: Timestamp::now(),
        });
    }
}

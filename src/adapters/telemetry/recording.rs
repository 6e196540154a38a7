//! In-memory telemetry sink for tests.
//!
//! Captures every published event in order for assertions.

use std::sync::{PoisonError, RwLock};

use crate::domain::telemetry::TelemetryEvent;
use crate::ports::TelemetrySink;

/// Sink that records events instead of delivering them.
///
/// # Example
///
/// ```ignore
/// let sink = Arc::new(RecordingSink::new());
/// // ... run a query with `sink` wired in ...
/// assert_eq!(sink.event_types(), vec!["processing_start", "processing_complete"]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RwLock<Vec<TelemetryEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events, oldest first.
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The `type` tag of every event, oldest first.
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(TelemetryEvent::event_type)
            .collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<TelemetryEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all recorded events (for test isolation).
    pub fn clear(&self) {
        self.events
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl TelemetrySink for RecordingSink {
    fn publish(&self, event: TelemetryEvent) {
        self.events
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

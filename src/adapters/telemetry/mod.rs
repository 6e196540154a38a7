//! Telemetry sink adapters.

mod broadcast;
mod recording;

pub use broadcast::{BroadcastSink, DEFAULT_CHANNEL_CAPACITY};
pub use recording::RecordingSink;

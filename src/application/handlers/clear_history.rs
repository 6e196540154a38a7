//! ClearHistory command handler.
//!
//! Starts a fresh session: conversation history is emptied and the
//! session statistics are reset.

use std::sync::Arc;

use tracing::info;

use crate::application::assistant::Assistant;
use crate::domain::foundation::Timestamp;
use crate::domain::run::SessionStats;
use crate::domain::telemetry::TelemetryEvent;

#[derive(Debug, Clone, Copy, Default)]
pub struct ClearHistoryCommand;

#[derive(Debug, Clone)]
pub struct ClearHistoryResult {
    /// Turns removed from history.
    pub cleared_turns: usize,
    /// Statistics after the reset.
    pub stats: SessionStats,
}

/// Handler for ClearHistory commands.
pub struct ClearHistoryHandler {
    assistant: Arc<Assistant>,
}

impl ClearHistoryHandler {
    pub fn new(assistant: Arc<Assistant>) -> Self {
        Self { assistant }
    }

    pub fn handle(&self, _cmd: ClearHistoryCommand) -> ClearHistoryResult {
        let cleared_turns = {
            let mut history = self.assistant.lock_history();
            let len = history.len();
            history.clear();
            len
        };
        let stats = self.assistant.stats().reset();

        info!(cleared_turns, "Conversation history cleared");
        self.assistant.publish(TelemetryEvent::HistoryCleared {
            timestamp: Timestamp::now(),
        });
        self.assistant
            .publish(TelemetryEvent::StatsUpdate(stats.clone()));

        ClearHistoryResult {
            cleared_turns,
            stats,
        }
    }
}

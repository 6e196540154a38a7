//! Session-wide usage counters shown on the dashboard.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

use crate::domain::foundation::Timestamp;
use crate::domain::telemetry::Section;

/// Snapshot of session statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_queries: u64,
    pub s1_calls: u64,
    pub s2_calls: u64,
    pub s3_calls: u64,
    pub s4_calls: u64,
    pub total_response_time: f64,
    pub avg_response_time: f64,
    pub session_start: Option<Timestamp>,
}

impl SessionStats {
    pub fn tool_calls(&self) -> u64 {
        self.s1_calls + self.s2_calls + self.s3_calls + self.s4_calls
    }
}

/// Thread-safe accumulator behind [`SessionStats`].
#[derive(Debug, Default)]
pub struct StatsTracker {
    stats: Mutex<SessionStats>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a tool start against its section.
    pub fn record_tool_start(&self, section: Section) {
        let mut stats = self.lock();
        let counter = match section {
            Section::S1 => &mut stats.s1_calls,
            Section::S2 => &mut stats.s2_calls,
            Section::S3 => &mut stats.s3_calls,
            Section::S4 => &mut stats.s4_calls,
        };
        *counter += 1;
    }

    /// Marks the first query of the session.
    pub fn mark_session_start(&self) {
        let mut stats = self.lock();
        if stats.session_start.is_none() {
            stats.session_start = Some(Timestamp::now());
        }
    }

    /// Folds a finished query into the running average.
    pub fn record_query(&self, response_time: f64) -> SessionStats {
        let mut stats = self.lock();
        stats.total_queries += 1;
        stats.total_response_time += response_time.max(0.0);
        stats.avg_response_time = stats.total_response_time / stats.total_queries as f64;
        stats.clone()
    }

    /// Zeroes every counter and starts a new session now.
    pub fn reset(&self) -> SessionStats {
        let mut stats = self.lock();
        *stats = SessionStats {
            session_start: Some(Timestamp::now()),
            ..SessionStats::default()
        };
        stats.clone()
    }

    pub fn snapshot(&self) -> SessionStats {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_starts_count_per_section() {
        let tracker = StatsTracker::new();
        tracker.record_tool_start(Section::S2);
        tracker.record_tool_start(Section::S2);
        tracker.record_tool_start(Section::S4);

        let stats = tracker.snapshot();
        assert_eq!(stats.s2_calls, 2);
        assert_eq!(stats.s4_calls, 1);
        assert_eq!(stats.tool_calls(), 3);
    }

    #[test]
    fn average_response_time_tracks_queries() {
        let tracker = StatsTracker::new();
        tracker.record_query(1.0);
        let stats = tracker.record_query(3.0);

        assert_eq!(stats.total_queries, 2);
        assert!((stats.avg_response_time - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn session_start_is_set_once() {
        let tracker = StatsTracker::new();
        tracker.mark_session_start();
        let first = tracker.snapshot().session_start;
        tracker.mark_session_start();
        assert_eq!(tracker.snapshot().session_start, first);
    }

    #[test]
    fn reset_clears_counters_and_restarts_session() {
        let tracker = StatsTracker::new();
        tracker.record_tool_start(Section::S3);
        tracker.record_query(2.0);

        let stats = tracker.reset();
        assert_eq!(stats.total_queries, 0);
        assert_eq!(stats.tool_calls(), 0);
        assert!(stats.session_start.is_some());
    }
}

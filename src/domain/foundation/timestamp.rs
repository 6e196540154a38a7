//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Elapsed seconds from `earlier` to this timestamp, never negative.
    pub fn secs_since(&self, earlier: &Timestamp) -> f64 {
        let micros = self.duration_since(earlier).num_microseconds().unwrap_or(0);
        (micros.max(0) as f64) / 1_000_000.0
    }

    /// Military date-time group, e.g. `151030Z JAN 24`.
    pub fn to_dtg(&self) -> String {
        self.0.format("%d%H%MZ %b %y").to_string().to_uppercase()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

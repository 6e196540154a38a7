//! Feasibility aggregation.
//!
//! Combines S-2, S-3 and S-4 status snapshots into a GO / GO WITH CAVEATS /
//! NO-GO decision with a numeric score and a formatted report. The
//! computation is pure and never fails: a missing or malformed field only
//! costs the points that depend on it.

mod calculator;
mod decision;
mod narrative;
mod snapshots;

pub use calculator::{
    compute_operation_feasibility, FeasibilityCalculator, FeasibilityResult, ScoreBreakdown,
    SustainmentCheck, CAVEATS_THRESHOLD, GO_THRESHOLD,
};
pub use decision::Decision;
pub use narrative::render_narrative;
pub use snapshots::{
    parse_percent, CommsSnapshot, FeasibilityInput, ReadinessSnapshot, SupplySnapshot,
    SustainmentSnapshot, TerrainSnapshot, ThreatLevel, ThreatSnapshot, VehicleSnapshot,
    WeatherSnapshot,
};

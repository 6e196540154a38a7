//! Additive multi-factor feasibility scoring.

use serde::{Deserialize, Serialize};

use super::narrative::render_narrative;
use super::snapshots::{
    CommsSnapshot, FeasibilityInput, ReadinessSnapshot, SupplySnapshot, SustainmentSnapshot,
    TerrainSnapshot, ThreatLevel, ThreatSnapshot, VehicleSnapshot, WeatherSnapshot,
};
use super::Decision;

/// Winds above this many mph cost the weather point.
pub const MAX_WIND_MPH: f64 = 20.0;
/// Visibility below this many meters costs the weather point.
pub const MIN_VISIBILITY_METERS: f64 = 5000.0;
pub const MIN_PERSONNEL_READINESS: f64 = 90.0;
pub const MIN_EQUIPMENT_READINESS: f64 = 85.0;
pub const MIN_VEHICLE_RATE: f64 = 0.70;

/// Minimum score for GO, provided sustainment is satisfied.
pub const GO_THRESHOLD: i32 = 7;
/// Minimum score for GO WITH CAVEATS.
pub const CAVEATS_THRESHOLD: i32 = 5;

/// Points contributed by each criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub weather: i32,
    pub terrain: i32,
    pub threat: i32,
    pub readiness: i32,
    pub vehicles: i32,
    pub comms: i32,
    pub sustainment: i32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        self.weather
            + self.terrain
            + self.threat
            + self.readiness
            + self.vehicles
            + self.comms
            + self.sustainment
    }
}

/// Outcome of the on-hand vs required comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SustainmentCheck {
    pub points: i32,
    pub sustainment_ok: bool,
}

/// Result of a feasibility assessment.
///
/// The score is documented on a 0-10 scale but can reach 12 when
/// sustainment is supplied and satisfied. It is never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityResult {
    pub narrative: String,
    pub decision: Decision,
    pub score: i32,
    pub sustainment_ok: bool,
    pub breakdown: ScoreBreakdown,
}

/// Rule-based feasibility calculator.
pub struct FeasibilityCalculator;

impl FeasibilityCalculator {
    /// +1 for wind at or under 20 mph, +1 for visibility of at least 5000 m.
    pub fn weather_points(weather: &WeatherSnapshot) -> i32 {
        let calm = weather.wind_speed_mph.is_some_and(|w| w <= MAX_WIND_MPH);
        let visible = weather
            .visibility_meters
            .is_some_and(|v| v >= MIN_VISIBILITY_METERS);
        i32::from(calm) + i32::from(visible)
    }

    pub fn terrain_points(terrain: &TerrainSnapshot) -> i32 {
        let good = terrain
            .mobility_assessment
            .as_deref()
            .is_some_and(|m| m.trim().eq_ignore_ascii_case("good"));
        i32::from(good)
    }

    /// LOW is worth 2, MODERATE 1, anything else nothing.
    pub fn threat_points(threat: &ThreatSnapshot) -> i32 {
        match threat.level() {
            Some(ThreatLevel::Low) => 2,
            Some(ThreatLevel::Moderate) => 1,
            _ => 0,
        }
    }

    pub fn readiness_points(readiness: &ReadinessSnapshot) -> i32 {
        i32::from(readiness.personnel_percent() >= MIN_PERSONNEL_READINESS)
            + i32::from(readiness.equipment_percent() >= MIN_EQUIPMENT_READINESS)
    }

    pub fn vehicle_points(vehicles: &VehicleSnapshot) -> i32 {
        i32::from(vehicles.readiness_rate() >= MIN_VEHICLE_RATE)
    }

    pub fn comms_points(comms: &CommsSnapshot) -> i32 {
        i32::from(comms.primary_operational()) + i32::from(comms.alternate_operational())
    }

    /// Compares on-hand MREs and fuel against the computed requirements.
    ///
    /// Without a sustainment input the check passes and contributes nothing.
    /// Missing quantities count as zero, so an unknown on-hand figure is a
    /// shortfall against any positive requirement.
    pub fn sustainment(
        sustainment: Option<&SustainmentSnapshot>,
        mres: &SupplySnapshot,
        fuel: &SupplySnapshot,
    ) -> SustainmentCheck {
        let Some(required) = sustainment else {
            return SustainmentCheck {
                points: 0,
                sustainment_ok: true,
            };
        };

        let mres_met = mres.quantity.unwrap_or(0.0) >= required.mres_required.unwrap_or(0.0);
        let fuel_met =
            fuel.quantity.unwrap_or(0.0) >= required.fuel_required_gallons.unwrap_or(0.0);

        if mres_met && fuel_met {
            SustainmentCheck {
                points: 2,
                sustainment_ok: true,
            }
        } else {
            SustainmentCheck {
                points: 0,
                sustainment_ok: false,
            }
        }
    }

    pub fn breakdown(input: &FeasibilityInput) -> (ScoreBreakdown, bool) {
        let sustainment = Self::sustainment(
            input.sustainment.as_ref(),
            &input.supply_mres,
            &input.supply_fuel,
        );
        let breakdown = ScoreBreakdown {
            weather: Self::weather_points(&input.weather),
            terrain: Self::terrain_points(&input.terrain),
            threat: Self::threat_points(&input.threat),
            readiness: Self::readiness_points(&input.readiness),
            vehicles: Self::vehicle_points(&input.vehicles),
            comms: Self::comms_points(&input.comms),
            sustainment: sustainment.points,
        };
        (breakdown, sustainment.sustainment_ok)
    }

    /// GO needs 7 points and satisfied sustainment; 5 points earn caveats.
    pub fn decide(score: i32, sustainment_ok: bool) -> Decision {
        if score >= GO_THRESHOLD && sustainment_ok {
            Decision::Go
        } else if score >= CAVEATS_THRESHOLD {
            Decision::GoWithCaveats
        } else {
            Decision::NoGo
        }
    }

    pub fn assess(input: &FeasibilityInput) -> FeasibilityResult {
        let (breakdown, sustainment_ok) = Self::breakdown(input);
        let score = breakdown.total();
        let decision = Self::decide(score, sustainment_ok);
        FeasibilityResult {
            narrative: render_narrative(input, score, decision, sustainment_ok),
            decision,
            score,
            sustainment_ok,
            breakdown,
        }
    }
}

/// Scores an operation and renders its S-3 feasibility report.
pub fn compute_operation_feasibility(input: &FeasibilityInput) -> FeasibilityResult {
    FeasibilityCalculator::assess(input)
}

//! Status snapshots consumed by the feasibility calculator.
//!
//! Snapshots are produced ad hoc by upstream tool calls, so every field is
//! optional and extraction from JSON never fails. A field that is missing or
//! has the wrong shape is simply `None`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reads a string field. Numbers and booleans are rendered as text.
pub(crate) fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads a numeric field. Numeric strings are accepted.
pub(crate) fn number_field(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Formats a quantity the way an operator writes it: integral values lose
/// their fractional part.
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub condition: Option<String>,
    pub temperature_f: Option<f64>,
    pub wind_speed_mph: Option<f64>,
    pub visibility_meters: Option<f64>,
}

impl From<&Value> for WeatherSnapshot {
    fn from(value: &Value) -> Self {
        Self {
            condition: text_field(value, "condition"),
            temperature_f: number_field(value, "temperature_f"),
            wind_speed_mph: number_field(value, "wind_speed_mph"),
            visibility_meters: number_field(value, "visibility_meters"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerrainSnapshot {
    pub primary_terrain: Option<String>,
    pub mobility_assessment: Option<String>,
}

impl From<&Value> for TerrainSnapshot {
    fn from(value: &Value) -> Self {
        Self {
            primary_terrain: text_field(value, "primary_terrain"),
            mobility_assessment: text_field(value, "mobility_assessment"),
        }
    }
}

/// Threat levels reported by the S-2 threat assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatLevel {
    Low,
    Moderate,
    Elevated,
    High,
}

impl ThreatLevel {
    pub const ALL: [ThreatLevel; 4] = [
        ThreatLevel::Low,
        ThreatLevel::Moderate,
        ThreatLevel::Elevated,
        ThreatLevel::High,
    ];

    /// Parses a level case-insensitively. Unknown text yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MODERATE" => Some(Self::Moderate),
            "ELEVATED" => Some(Self::Elevated),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::Elevated => "ELEVATED",
            Self::High => "HIGH",
        }
    }
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreatSnapshot {
    pub threat_level: Option<String>,
    pub recommended_posture: Option<String>,
}

impl ThreatSnapshot {
    pub fn level(&self) -> Option<ThreatLevel> {
        self.threat_level.as_deref().and_then(ThreatLevel::parse)
    }
}

impl From<&Value> for ThreatSnapshot {
    fn from(value: &Value) -> Self {
        Self {
            threat_level: text_field(value, "threat_level"),
            recommended_posture: text_field(value, "recommended_posture"),
        }
    }
}

/// Readiness percentages as reported, e.g. `"95%"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadinessSnapshot {
    pub personnel_readiness: Option<String>,
    pub equipment_readiness: Option<String>,
}

/// Parses a percentage such as `"92%"` or `"92"`. Anything unparseable is 0.
pub fn parse_percent(text: &str) -> f64 {
    text.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .unwrap_or(0.0)
}

impl ReadinessSnapshot {
    pub fn personnel_percent(&self) -> f64 {
        self.personnel_readiness.as_deref().map_or(0.0, parse_percent)
    }

    pub fn equipment_percent(&self) -> f64 {
        self.equipment_readiness.as_deref().map_or(0.0, parse_percent)
    }
}

impl From<&Value> for ReadinessSnapshot {
    fn from(value: &Value) -> Self {
        let personnel = value
            .get("personnel_strength")
            .and_then(|strength| text_field(strength, "readiness_percent"))
            .or_else(|| text_field(value, "personnel_readiness"));
        Self {
            personnel_readiness: personnel,
            equipment_readiness: text_field(value, "equipment_readiness"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub operational: Option<f64>,
    pub total: Option<f64>,
}

impl VehicleSnapshot {
    /// Operational fraction of the fleet, 0 when the total is unknown or 0.
    pub fn readiness_rate(&self) -> f64 {
        match (self.operational, self.total) {
            (Some(operational), Some(total)) if total > 0.0 => operational / total,
            _ => 0.0,
        }
    }
}

impl From<&Value> for VehicleSnapshot {
    fn from(value: &Value) -> Self {
        Self {
            operational: number_field(value, "operational"),
            total: number_field(value, "total"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommsSnapshot {
    pub primary_status: Option<String>,
    pub alternate_status: Option<String>,
}

impl CommsSnapshot {
    pub fn primary_operational(&self) -> bool {
        is_operational(self.primary_status.as_deref())
    }

    pub fn alternate_operational(&self) -> bool {
        is_operational(self.alternate_status.as_deref())
    }
}

fn is_operational(status: Option<&str>) -> bool {
    status.is_some_and(|s| s.trim().eq_ignore_ascii_case("OPERATIONAL"))
}

impl From<&Value> for CommsSnapshot {
    fn from(value: &Value) -> Self {
        let status = |net: &str| value.get(net).and_then(|n| text_field(n, "status"));
        Self {
            primary_status: status("primary_net"),
            alternate_status: status("alternate_net"),
        }
    }
}

/// One line of the supply inventory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplySnapshot {
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub location: Option<String>,
}

impl From<&Value> for SupplySnapshot {
    fn from(value: &Value) -> Self {
        Self {
            quantity: number_field(value, "quantity"),
            unit: text_field(value, "unit"),
            location: text_field(value, "location"),
        }
    }
}

/// Computed requirements from the sustainment calculator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SustainmentSnapshot {
    pub mres_required: Option<f64>,
    pub fuel_required_gallons: Option<f64>,
}

impl SustainmentSnapshot {
    /// Extracts requirements from a sustainment record. Only a non-empty
    /// object counts as a supplied sustainment input.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        if object.is_empty() {
            return None;
        }
        let requirements = value.get("requirements").unwrap_or(&Value::Null);
        Some(Self {
            mres_required: number_field(requirements, "mres_required"),
            fuel_required_gallons: number_field(requirements, "fuel_required_gallons"),
        })
    }
}

/// Everything the calculator looks at for one operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityInput {
    pub operation_name: String,
    pub grid_reference: String,
    pub start_time_zulu: String,
    pub duration_hours: i64,
    pub weather: WeatherSnapshot,
    pub terrain: TerrainSnapshot,
    pub threat: ThreatSnapshot,
    pub readiness: ReadinessSnapshot,
    pub vehicles: VehicleSnapshot,
    pub comms: CommsSnapshot,
    pub supply_mres: SupplySnapshot,
    pub supply_fuel: SupplySnapshot,
    pub sustainment: Option<SustainmentSnapshot>,
}

impl FeasibilityInput {
    /// Builds an input from a tool-call argument object.
    pub fn from_arguments(args: &Value) -> Self {
        let section = |key: &str| args.get(key).unwrap_or(&Value::Null);
        Self {
            operation_name: text_field(args, "operation_name").unwrap_or_default(),
            grid_reference: text_field(args, "grid_reference").unwrap_or_default(),
            start_time_zulu: text_field(args, "start_time_zulu").unwrap_or_default(),
            duration_hours: number_field(args, "duration_hours").map_or(0, |h| h as i64),
            weather: section("weather").into(),
            terrain: section("terrain").into(),
            threat: section("threat").into(),
            readiness: section("readiness").into(),
            vehicles: section("vehicle_status").into(),
            comms: section("comms").into(),
            supply_mres: section("supply_mres").into(),
            supply_fuel: section("supply_fuel").into(),
            sustainment: SustainmentSnapshot::from_value(section("sustainment")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn weather_tolerates_strings_and_missing_fields() {
        let weather = WeatherSnapshot::from(&json!({"wind_speed_mph": "12", "condition": "Fog"}));
        assert_eq!(weather.wind_speed_mph, Some(12.0));
        assert_eq!(weather.visibility_meters, None);
        assert_eq!(weather.condition.as_deref(), Some("Fog"));
    }

    #[test]
    fn wrong_shapes_become_none() {
        let weather = WeatherSnapshot::from(&json!({"wind_speed_mph": [1, 2]}));
        assert_eq!(weather.wind_speed_mph, None);

        let vehicles = VehicleSnapshot::from(&json!("not an object"));
        assert_eq!(vehicles, VehicleSnapshot::default());
    }

    #[test]
    fn readiness_reads_nested_personnel_percent() {
        let readiness = ReadinessSnapshot::from(&json!({
            "personnel_strength": {"readiness_percent": "95%"},
            "equipment_readiness": "88%"
        }));
        assert_eq!(readiness.personnel_percent(), 95.0);
        assert_eq!(readiness.equipment_percent(), 88.0);
    }

    #[test]
    fn unparseable_percent_is_zero() {
        assert_eq!(parse_percent("n/a"), 0.0);
        assert_eq!(parse_percent(""), 0.0);
        assert_eq!(parse_percent(" 91 % "), 91.0);
    }

    #[test]
    fn vehicle_rate_guards_zero_total() {
        let fleet = VehicleSnapshot {
            operational: Some(3.0),
            total: Some(0.0),
        };
        assert_eq!(fleet.readiness_rate(), 0.0);
    }

    #[test]
    fn threat_level_parses_case_insensitively() {
        assert_eq!(ThreatLevel::parse("low"), Some(ThreatLevel::Low));
        assert_eq!(ThreatLevel::parse(" Moderate "), Some(ThreatLevel::Moderate));
        assert_eq!(ThreatLevel::parse("SEVERE"), None);
    }

    #[test]
    fn comms_reads_nested_net_status() {
        let comms = CommsSnapshot::from(&json!({
            "primary_net": {"status": "OPERATIONAL"},
            "alternate_net": {"status": "DOWN"}
        }));
        assert!(comms.primary_operational());
        assert!(!comms.alternate_operational());
    }

    #[test]
    fn empty_sustainment_object_is_not_supplied() {
        assert_eq!(SustainmentSnapshot::from_value(&json!({})), None);
        assert_eq!(SustainmentSnapshot::from_value(&Value::Null), None);
        let supplied = SustainmentSnapshot::from_value(&json!({
            "requirements": {"mres_required": 900, "fuel_required_gallons": 1200}
        }));
        assert_eq!(supplied.and_then(|s| s.mres_required), Some(900.0));
    }

    #[test]
    fn format_number_drops_integral_fraction() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(2.5), "2.5");
    }
}

//! S-2 intelligence tools: weather, terrain, threat and SPOT reporting.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::catalog::{parse_args, pick, to_json, ToolSpec};
use super::{ToolDefinition, ToolError};
use crate::domain::decision_package::{build_spot, SaluteObservation, SpotReport};
use crate::domain::foundation::Timestamp;
use crate::domain::telemetry::Section;

const CONDITIONS: [&str; 5] = ["Clear", "Partly Cloudy", "Overcast", "Light Rain", "Fog"];
const WIND_DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
const TERRAIN_TYPES: [&str; 5] = ["Mountainous", "Desert", "Urban", "Forest", "Coastal"];
const THREAT_LEVELS: [&str; 4] = ["LOW", "MODERATE", "ELEVATED", "HIGH"];

#[derive(Debug, Deserialize)]
struct WeatherParams {
    grid_reference: String,
    #[serde(default)]
    hours_ahead: i64,
}

#[derive(Debug, Serialize)]
pub struct WeatherReport {
    pub grid_reference: String,
    pub time: String,
    pub temperature_f: i64,
    pub condition: String,
    pub wind_speed_mph: i64,
    pub wind_direction: String,
    pub visibility_meters: i64,
    pub precipitation_chance: i64,
    pub moon_illumination: String,
}

fn get_weather_conditions(args: &Value, rng: &mut StdRng) -> Result<Value, ToolError> {
    const NAME: &str = "get_weather_conditions";
    let params: WeatherParams = parse_args(NAME, args)?;

    let base_temp = rng.gen_range(65..=95);
    let (condition, temperature_f) = if params.hours_ahead == 0 {
        ("Clear", base_temp)
    } else {
        (pick(rng, &CONDITIONS), base_temp + rng.gen_range(-10..=10))
    };

    let report = WeatherReport {
        grid_reference: params.grid_reference,
        time: if params.hours_ahead > 0 {
            format!("+{} hours", params.hours_ahead)
        } else {
            "Current".to_string()
        },
        temperature_f,
        condition: condition.to_string(),
        wind_speed_mph: rng.gen_range(5..=25),
        wind_direction: pick(rng, &WIND_DIRECTIONS).to_string(),
        visibility_meters: if condition == "Fog" { 1000 } else { 10000 },
        precipitation_chance: if condition.contains("Rain") { 20 } else { 5 },
        moon_illumination: if params.hours_ahead > 12 {
            "73%".to_string()
        } else {
            "Waxing Gibbous".to_string()
        },
    };
    to_json(NAME, &report)
}

#[derive(Debug, Deserialize)]
struct TerrainParams {
    grid_reference: String,
    #[serde(default = "default_radius_km")]
    radius_km: i64,
}

fn default_radius_km() -> i64 {
    5
}

#[derive(Debug, Serialize)]
pub struct TerrainAnalysis {
    pub grid_reference: String,
    pub analysis_radius_km: i64,
    pub primary_terrain: String,
    pub elevation_range_m: String,
    pub key_terrain: Vec<String>,
    pub obstacles: Vec<String>,
    pub cover_concealment: String,
    pub mobility_assessment: String,
    pub recommended_approach: String,
}

fn get_terrain_analysis(args: &Value, rng: &mut StdRng) -> Result<Value, ToolError> {
    const NAME: &str = "get_terrain_analysis";
    let params: TerrainParams = parse_args(NAME, args)?;
    if params.radius_km <= 0 {
        return Err(ToolError::invalid(NAME, "radius_km must be positive"));
    }

    let terrain = pick(rng, &TERRAIN_TYPES);
    let obstacles: &[&str] = if terrain == "Desert" {
        &["Wadi system", "Urban sprawl"]
    } else {
        &["Dense vegetation"]
    };

    let analysis = TerrainAnalysis {
        grid_reference: params.grid_reference,
        analysis_radius_km: params.radius_km,
        primary_terrain: terrain.to_string(),
        elevation_range_m: format!("{}-{}", rng.gen_range(50..=200), rng.gen_range(300..=800)),
        key_terrain: ["Hill 362", "MSR Tampa", "Bridge Point Alpha"]
            .map(String::from)
            .to_vec(),
        obstacles: obstacles.iter().map(|o| o.to_string()).collect(),
        cover_concealment: if matches!(terrain, "Forest" | "Urban") {
            "Good"
        } else {
            "Limited"
        }
        .to_string(),
        mobility_assessment: if terrain == "Mountainous" {
            "Restricted"
        } else {
            "Good"
        }
        .to_string(),
        recommended_approach: "Northwest ridge line provides best cover".to_string(),
    };
    to_json(NAME, &analysis)
}

#[derive(Debug, Deserialize)]
struct ThreatParams {
    area: String,
}

#[derive(Debug, Serialize)]
pub struct ThreatAssessment {
    pub area: String,
    pub threat_level: String,
    pub last_contact: String,
    pub enemy_strength: String,
    pub enemy_activity: String,
    pub idf_threat: String,
    pub pattern_analysis: String,
    pub recommended_posture: String,
}

fn check_threat_assessment(args: &Value, rng: &mut StdRng) -> Result<Value, ToolError> {
    const NAME: &str = "check_threat_assessment";
    let params: ThreatParams = parse_args(NAME, args)?;

    let level = pick(rng, &THREAT_LEVELS);
    let low = level == "LOW";
    let assessment = ThreatAssessment {
        area: params.area,
        threat_level: level.to_string(),
        last_contact: format!("{} hours ago", rng.gen_range(2..=48)),
        enemy_strength: if level == "MODERATE" {
            "Squad-sized element"
        } else {
            "Unknown"
        }
        .to_string(),
        enemy_activity: if low {
            "No recent activity"
        } else {
            "Sporadic small arms fire"
        }
        .to_string(),
        idf_threat: if matches!(level, "ELEVATED" | "HIGH") {
            "Possible"
        } else {
            "Unlikely"
        }
        .to_string(),
        pattern_analysis: "Enemy typically active during dawn/dusk".to_string(),
        recommended_posture: if low {
            "Normal operations"
        } else {
            "Heightened security"
        }
        .to_string(),
    };
    to_json(NAME, &assessment)
}

#[derive(Debug, Deserialize)]
struct SpotParams {
    reporting_unit: String,
    #[serde(flatten)]
    observation: SaluteObservation,
}

#[derive(Debug, Serialize)]
struct SpotEnvelope {
    report_type: &'static str,
    report_data: SpotReport,
    dtg: String,
    reporting_unit: String,
}

fn generate_spot_report(args: &Value, _rng: &mut StdRng) -> Result<Value, ToolError> {
    const NAME: &str = "generate_spot_report";
    let params: SpotParams = parse_args(NAME, args)?;

    let dtg = Timestamp::now().to_dtg();
    let report = build_spot(&params.reporting_unit, params.observation, dtg.clone());
    to_json(
        NAME,
        &SpotEnvelope {
            report_type: "SPOT",
            report_data: report,
            dtg,
            reporting_unit: params.reporting_unit,
        },
    )
}

pub(super) fn specs() -> Vec<ToolSpec> {
    let string = json!({"type": "string"});
    vec![
        ToolSpec::new(
            ToolDefinition::new(
                "get_weather_conditions",
                Section::S2,
                "Get current and forecast weather conditions for a grid reference.",
                json!({
                    "type": "object",
                    "required": ["grid_reference"],
                    "properties": {
                        "grid_reference": {"type": "string", "description": "MGRS grid reference"},
                        "hours_ahead": {"type": "integer", "default": 0, "description": "Forecast offset in hours, 0 for current"}
                    }
                }),
            ),
            get_weather_conditions,
        ),
        ToolSpec::new(
            ToolDefinition::new(
                "get_terrain_analysis",
                Section::S2,
                "Get terrain analysis for an area of operations.",
                json!({
                    "type": "object",
                    "required": ["grid_reference"],
                    "properties": {
                        "grid_reference": string,
                        "radius_km": {"type": "integer", "default": 5}
                    }
                }),
            ),
            get_terrain_analysis,
        ),
        ToolSpec::new(
            ToolDefinition::new(
                "check_threat_assessment",
                Section::S2,
                "Check current threat assessment for an area.",
                json!({
                    "type": "object",
                    "required": ["area"],
                    "properties": {"area": string}
                }),
            ),
            check_threat_assessment,
        ),
        ToolSpec::new(
            ToolDefinition::new(
                "generate_spot_report",
                Section::S2,
                "Generate a SPOT report in SALUTE format (size, activity, location, unit, time, equipment).",
                json!({
                    "type": "object",
                    "required": ["reporting_unit", "size", "activity", "location", "enemy_unit", "time_observed", "equipment"],
                    "properties": {
                        "reporting_unit": string,
                        "size": string,
                        "activity": string,
                        "location": string,
                        "enemy_unit": string,
                        "time_observed": string,
                        "equipment": string
                    }
                }),
            ),
            generate_spot_report,
        ),
    ]
}

//! S-3 operations tools, including the two planning aggregators.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::catalog::{parse_args, pick, to_json, ToolSpec};
use super::{ToolDefinition, ToolError};
use crate::domain::decision_package::{
    generate_decision_package, submit_report, DecisionRequest, Precedence,
};
use crate::domain::feasibility::{compute_operation_feasibility, FeasibilityInput};
use crate::domain::foundation::Timestamp;
use crate::domain::telemetry::Section;

const MISSION_STATUSES: [&str; 4] = ["IN_PROGRESS", "PLANNING", "COMPLETE", "ON_HOLD"];

#[derive(Debug, Default, Deserialize)]
struct MissionParams {
    #[serde(default)]
    mission_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MissionStatus {
    pub mission_id: String,
    pub mission_name: String,
    pub status: String,
    pub phase: String,
    pub units_involved: Vec<String>,
    pub start_time: String,
    pub estimated_completion: String,
    pub commander_intent: String,
    pub current_sitrep: String,
}

fn get_mission_status(args: &Value, rng: &mut StdRng) -> Result<Value, ToolError> {
    const NAME: &str = "get_mission_status";
    let params: MissionParams = parse_args(NAME, args)?;

    let mission_id = params
        .mission_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| format!("OP-{}", rng.gen_range(100..=999)));
    let status = pick(rng, &MISSION_STATUSES);

    let mission = MissionStatus {
        mission_id,
        mission_name: format!(
            "Operation {} {}",
            pick(rng, &["STEEL", "IRON", "EAGLE", "THUNDER"]),
            pick(rng, &["STORM", "HAWK", "SHIELD", "SPEAR"])
        ),
        status: status.to_string(),
        phase: if status == "IN_PROGRESS" {
            "Execution"
        } else {
            "Planning"
        }
        .to_string(),
        units_involved: vec![
            "2/5 Marines".to_string(),
            "3rd LAR".to_string(),
            "1st Recon Bn".to_string(),
        ],
        start_time: "0600Z".to_string(),
        estimated_completion: "1800Z".to_string(),
        commander_intent: "Secure and hold objective ALPHA".to_string(),
        current_sitrep: "All units in position, proceeding as planned".to_string(),
    };
    to_json(NAME, &mission)
}

#[derive(Debug, Deserialize)]
struct UnitParams {
    unit: String,
}

#[derive(Debug, Serialize)]
pub struct PersonnelStrength {
    pub assigned: u32,
    pub present: u32,
    pub ready: u32,
    pub readiness_percent: String,
}

#[derive(Debug, Serialize)]
pub struct UnitReadiness {
    pub unit: String,
    pub personnel_strength: PersonnelStrength,
    pub equipment_readiness: String,
    pub limiting_factors: Vec<String>,
    pub c_rating: String,
    pub last_updated: String,
    pub next_readiness_check: String,
}

const ASSIGNED_STRENGTH: u32 = 145;

fn check_unit_readiness(args: &Value, rng: &mut StdRng) -> Result<Value, ToolError> {
    const NAME: &str = "check_unit_readiness";
    let params: UnitParams = parse_args(NAME, args)?;

    let personnel: u32 = rng.gen_range(85..=98);
    let equipment: u32 = rng.gen_range(80..=95);

    let readiness = UnitReadiness {
        unit: params.unit,
        personnel_strength: PersonnelStrength {
            assigned: ASSIGNED_STRENGTH,
            present: 138,
            ready: ASSIGNED_STRENGTH * personnel / 100,
            readiness_percent: format!("{personnel}%"),
        },
        equipment_readiness: format!("{equipment}%"),
        limiting_factors: if equipment < 90 {
            vec![
                "2 Marines on light duty".to_string(),
                "1 vehicle in maintenance".to_string(),
            ]
        } else {
            vec!["None".to_string()]
        },
        c_rating: if personnel > 90 && equipment > 85 {
            "C-2"
        } else {
            "C-3"
        }
        .to_string(),
        last_updated: "2 hours ago".to_string(),
        next_readiness_check: "0600 tomorrow".to_string(),
    };
    to_json(NAME, &readiness)
}

#[derive(Debug, Deserialize)]
struct PatrolParams {
    unit: String,
    #[serde(default = "default_timeframe")]
    timeframe: String,
}

fn default_timeframe() -> String {
    "today".to_string()
}

#[derive(Debug, Serialize)]
pub struct Patrol {
    pub patrol_id: String,
    pub unit: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub departure: String,
    #[serde(rename = "return")]
    pub return_time: String,
    pub route: String,
    pub grid_points: Vec<String>,
    pub status: String,
}

fn get_patrol_schedule(args: &Value, rng: &mut StdRng) -> Result<Value, ToolError> {
    const NAME: &str = "get_patrol_schedule";
    let params: PatrolParams = parse_args(NAME, args)?;

    let count = if params.timeframe == "today" { 3 } else { 9 };
    let patrols: Vec<Patrol> = (0..count)
        .map(|i| Patrol {
            patrol_id: format!("PTL-{}", rng.gen_range(100..=999)),
            unit: format!("{}/{} Squad", params.unit, pick(rng, &["1st", "2nd", "3rd"])),
            kind: pick(rng, &["Security", "Recon", "Presence"]).to_string(),
            departure: format!("{:02}00", 6 + i * 6),
            return_time: format!("{:02}00", 10 + i * 6),
            route: format!("Route {}", pick(rng, &["RED", "BLUE", "GREEN"])),
            grid_points: vec![format!(
                "MC {} {}",
                rng.gen_range(10000..=99999),
                rng.gen_range(10000..=99999)
            )],
            status: if i == 0 { "Active" } else { "Scheduled" }.to_string(),
        })
        .collect();
    to_json(NAME, &patrols)
}

fn check_comms_status(_args: &Value, _rng: &mut StdRng) -> Result<Value, ToolError> {
    Ok(json!({
        "primary_net": {
            "type": "SINCGARS",
            "status": "OPERATIONAL",
            "signal_strength": "Strong",
            "crypto": "Loaded",
            "last_check": "30 minutes ago"
        },
        "alternate_net": {
            "type": "HF",
            "status": "OPERATIONAL",
            "signal_strength": "Moderate",
            "next_window": "1200Z"
        },
        "data_link": {
            "type": "BFT",
            "status": "OPERATIONAL",
            "satellites": 7,
            "latency_ms": 245
        },
        "emergency": {
            "type": "SATCOM",
            "status": "STANDBY",
            "channel": "GUARD"
        }
    }))
}

fn compute_feasibility(args: &Value, _rng: &mut StdRng) -> Result<Value, ToolError> {
    const NAME: &str = "compute_operation_feasibility";
    let input = FeasibilityInput::from_arguments(args);
    to_json(NAME, &compute_operation_feasibility(&input))
}

fn decision_package(args: &Value, _rng: &mut StdRng) -> Result<Value, ToolError> {
    const NAME: &str = "generate_decision_package";
    let request = DecisionRequest::from_arguments(args);
    to_json(NAME, &generate_decision_package(&request, Timestamp::now()))
}

#[derive(Debug, Deserialize)]
struct SubmitParams {
    report_type: String,
    destination: String,
    #[serde(default)]
    priority: Option<String>,
}

fn submit(args: &Value, rng: &mut StdRng) -> Result<Value, ToolError> {
    const NAME: &str = "submit_report";
    let params: SubmitParams = parse_args(NAME, args)?;
    if params.destination.trim().is_empty() {
        return Err(ToolError::invalid(NAME, "destination must not be empty"));
    }

    let priority = params
        .priority
        .as_deref()
        .map_or(Precedence::Routine, Precedence::parse);
    let receipt = submit_report(
        &params.report_type,
        &params.destination,
        priority,
        rng.gen_range(1000..=9999),
        Timestamp::now().to_dtg(),
    );
    to_json(NAME, &receipt)
}

fn feasibility_schema() -> Value {
    let record = json!({"type": "object"});
    json!({
        "type": "object",
        "required": [
            "operation_name", "grid_reference", "start_time_zulu", "duration_hours",
            "weather", "terrain", "threat", "readiness", "vehicle_status",
            "supply_mres", "supply_fuel", "comms"
        ],
        "properties": {
            "operation_name": {"type": "string"},
            "grid_reference": {"type": "string"},
            "start_time_zulu": {"type": "string", "description": "Start time, e.g. 0600Z"},
            "duration_hours": {"type": "integer"},
            "weather": record,
            "terrain": record,
            "threat": record,
            "readiness": record,
            "vehicle_status": record,
            "supply_mres": record,
            "supply_fuel": record,
            "comms": record,
            "sustainment": {"type": "object", "description": "Output of calculate_sustainment"}
        }
    })
}

pub(super) fn specs() -> Vec<ToolSpec> {
    let string = json!({"type": "string"});
    let string_list = json!({"type": "array", "items": {"type": "string"}});
    vec![
        ToolSpec::new(
            ToolDefinition::new(
                "get_mission_status",
                Section::S3,
                "Get current mission status.",
                json!({
                    "type": "object",
                    "properties": {"mission_id": string}
                }),
            ),
            get_mission_status,
        ),
        ToolSpec::new(
            ToolDefinition::new(
                "check_unit_readiness",
                Section::S3,
                "Check personnel and equipment readiness for a unit.",
                json!({
                    "type": "object",
                    "required": ["unit"],
                    "properties": {"unit": string}
                }),
            ),
            check_unit_readiness,
        ),
        ToolSpec::new(
            ToolDefinition::new(
                "get_patrol_schedule",
                Section::S3,
                "Get patrol schedule for a unit.",
                json!({
                    "type": "object",
                    "required": ["unit"],
                    "properties": {
                        "unit": string,
                        "timeframe": {"type": "string", "default": "today"}
                    }
                }),
            ),
            get_patrol_schedule,
        ),
        ToolSpec::new(
            ToolDefinition::nullary(
                "check_comms_status",
                Section::S3,
                "Check communication systems status.",
            ),
            check_comms_status,
        ),
        ToolSpec::new(
            ToolDefinition::new(
                "compute_operation_feasibility",
                Section::S3,
                "Aggregate S-2/S-3/S-4 inputs into a GO / GO WITH CAVEATS / NO-GO feasibility \
                 assessment. Call the staff tools first to populate the inputs.",
                feasibility_schema(),
            ),
            compute_feasibility,
        ),
        ToolSpec::new(
            ToolDefinition::new(
                "generate_decision_package",
                Section::S3,
                "Generate a FRAGO decision package from identified issues and recommendations.",
                json!({
                    "type": "object",
                    "required": ["frago_id", "mission_summary", "issues", "recommendations"],
                    "properties": {
                        "frago_id": string,
                        "mission_summary": string,
                        "assessments": {"type": "object"},
                        "issues": string_list,
                        "recommendations": string_list
                    }
                }),
            ),
            decision_package,
        ),
        ToolSpec::new(
            ToolDefinition::new(
                "submit_report",
                Section::S3,
                "Submit a report to higher headquarters.",
                json!({
                    "type": "object",
                    "required": ["report_type", "destination"],
                    "properties": {
                        "report_type": {"type": "string", "enum": ["LOGSTAT", "PERSTAT", "SPOT"]},
                        "destination": string,
                        "priority": {"type": "string", "enum": ["ROUTINE", "PRIORITY", "IMMEDIATE"], "default": "ROUTINE"}
                    }
                }),
            ),
            submit,
        ),
    ]
}

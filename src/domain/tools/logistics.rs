//! S-4 logistics tools: inventory, fleet status, resupply, sustainment and
//! LOGSTAT reporting.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::catalog::{parse_args, to_json, ToolSpec};
use super::{ToolDefinition, ToolError};
use crate::domain::decision_package::{build_logstat, LogstatReport};
use crate::domain::foundation::Timestamp;
use crate::domain::telemetry::Section;

#[derive(Debug, Deserialize)]
struct InventoryParams {
    unit: String,
    supply_type: String,
}

#[derive(Debug, Serialize)]
pub struct SupplyStatus {
    pub item: String,
    pub quantity: i64,
    pub unit: String,
    pub location: String,
    pub days_remaining: i64,
}

/// Quantity range, unit of issue and days of supply for known items.
type InventoryProfile = (std::ops::RangeInclusive<i64>, &'static str, i64);

fn inventory_profile(supply_type: &str) -> Option<InventoryProfile> {
    match supply_type {
        "MREs" | "MRE" => Some((500..=2000, "meals", 7)),
        "5.56mm" => Some((10000..=50000, "rounds", 14)),
        "7.62mm" => Some((5000..=20000, "rounds", 10)),
        "fuel" => Some((1000..=5000, "gallons", 5)),
        "water" => Some((500..=2000, "gallons", 3)),
        "medical" => Some((50..=200, "kits", 30)),
        _ => None,
    }
}

fn check_supply_inventory(args: &Value, rng: &mut StdRng) -> Result<Value, ToolError> {
    const NAME: &str = "check_supply_inventory";
    let params: InventoryParams = parse_args(NAME, args)?;

    let (quantity, unit, days_remaining) = match inventory_profile(&params.supply_type) {
        Some((range, unit, days)) => (rng.gen_range(range), unit, days),
        None => (0, "unknown", 0),
    };

    to_json(
        NAME,
        &SupplyStatus {
            location: format!("{} Supply Point", params.unit),
            item: params.supply_type,
            quantity,
            unit: unit.to_string(),
            days_remaining,
        },
    )
}

#[derive(Debug, Deserialize)]
struct VehicleParams {
    vehicle_type: String,
    unit: String,
}

#[derive(Debug, Serialize)]
pub struct VehicleStatus {
    pub vehicle_type: String,
    pub unit: String,
    pub operational: u32,
    pub in_maintenance: u32,
    pub total: u32,
    pub readiness_rate: String,
    pub next_maintenance: String,
}

/// Operational, in-maintenance and total counts per vehicle type.
fn fleet(vehicle_type: &str) -> (u32, u32, u32) {
    match vehicle_type {
        "LAV" => (8, 2, 10),
        "HMMWV" => (15, 3, 18),
        "MTVR" => (6, 1, 7),
        "AAV" => (4, 2, 6),
        _ => (0, 0, 0),
    }
}

fn check_vehicle_status(args: &Value, _rng: &mut StdRng) -> Result<Value, ToolError> {
    const NAME: &str = "check_vehicle_status";
    let params: VehicleParams = parse_args(NAME, args)?;

    let (operational, in_maintenance, total) = fleet(&params.vehicle_type);
    let rate = if total > 0 {
        f64::from(operational) / f64::from(total) * 100.0
    } else {
        0.0
    };

    to_json(
        NAME,
        &VehicleStatus {
            vehicle_type: params.vehicle_type,
            unit: params.unit,
            operational,
            in_maintenance,
            total,
            readiness_rate: format!("{rate:.1}%"),
            next_maintenance: "72 hours".to_string(),
        },
    )
}

#[derive(Debug, Deserialize)]
struct ResupplyParams {
    unit: String,
    supply_type: String,
    quantity: i64,
    priority: String,
}

#[derive(Debug, Serialize)]
pub struct ResupplyRequest {
    pub request_id: String,
    pub unit: String,
    pub supply_type: String,
    pub quantity_requested: i64,
    pub priority: String,
    pub status: String,
    pub estimated_delivery: String,
    pub delivery_method: String,
}

fn request_resupply(args: &Value, rng: &mut StdRng) -> Result<Value, ToolError> {
    const NAME: &str = "request_resupply";
    let params: ResupplyParams = parse_args(NAME, args)?;
    if params.quantity <= 0 {
        return Err(ToolError::invalid(NAME, "quantity must be positive"));
    }

    let eta_hours = match params.priority.to_lowercase().as_str() {
        "urgent" => 6,
        "priority" => 12,
        _ => 24,
    };

    to_json(
        NAME,
        &ResupplyRequest {
            request_id: format!("RSP-{}", rng.gen_range(1000..=9999)),
            unit: params.unit,
            supply_type: params.supply_type,
            quantity_requested: params.quantity,
            priority: params.priority.to_uppercase(),
            status: "APPROVED".to_string(),
            estimated_delivery: format!("{eta_hours} hours"),
            delivery_method: if eta_hours > 12 { "Convoy" } else { "Air" }.to_string(),
        },
    )
}

#[derive(Debug, Deserialize)]
struct SustainmentParams {
    unit: String,
    personnel_count: i64,
    duration_hours: i64,
    #[serde(default = "default_mres_rate")]
    mres_per_day_per_person: f64,
    #[serde(default = "default_fuel_rate")]
    fuel_gallons_per_hour: f64,
}

fn default_mres_rate() -> f64 {
    3.0
}

fn default_fuel_rate() -> f64 {
    50.0
}

#[derive(Debug, Serialize)]
pub struct SustainmentAssumptions {
    pub mres_per_day_per_person: f64,
    pub fuel_gallons_per_hour: f64,
}

#[derive(Debug, Serialize)]
pub struct SustainmentRequirements {
    pub mres_required: i64,
    pub fuel_required_gallons: i64,
}

#[derive(Debug, Serialize)]
pub struct SustainmentPlan {
    pub unit: String,
    pub duration_hours: i64,
    pub assumptions: SustainmentAssumptions,
    pub requirements: SustainmentRequirements,
    pub notes: String,
}

/// Whole days covered by `hours`, rounding half to even, never below one.
pub fn sustainment_days(hours: i64) -> i64 {
    let whole = hours.div_euclid(24);
    let rem = hours.rem_euclid(24);
    let rounded = match (rem * 2).cmp(&24) {
        std::cmp::Ordering::Greater => whole + 1,
        std::cmp::Ordering::Equal => whole + whole.rem_euclid(2),
        std::cmp::Ordering::Less => whole,
    };
    rounded.max(1)
}

fn calculate_sustainment(args: &Value, _rng: &mut StdRng) -> Result<Value, ToolError> {
    const NAME: &str = "calculate_sustainment";
    let params: SustainmentParams = parse_args(NAME, args)?;
    if params.personnel_count < 0 {
        return Err(ToolError::invalid(NAME, "personnel_count must not be negative"));
    }
    if params.duration_hours < 0 {
        return Err(ToolError::invalid(NAME, "duration_hours must not be negative"));
    }

    let days = sustainment_days(params.duration_hours);
    let meals = params.personnel_count as f64 * days as f64 * params.mres_per_day_per_person;
    let mres_required = meals.trunc() as i64;
    let fuel_required_gallons =
        (params.duration_hours as f64 * params.fuel_gallons_per_hour).trunc() as i64;

    to_json(
        NAME,
        &SustainmentPlan {
            unit: params.unit,
            duration_hours: params.duration_hours,
            assumptions: SustainmentAssumptions {
                mres_per_day_per_person: params.mres_per_day_per_person,
                fuel_gallons_per_hour: params.fuel_gallons_per_hour,
            },
            requirements: SustainmentRequirements {
                mres_required,
                fuel_required_gallons,
            },
            notes: "Compare requirements vs. current inventory; if shortfall, request resupply."
                .to_string(),
        },
    )
}

#[derive(Debug, Deserialize)]
struct LogstatParams {
    unit: String,
    issue_description: String,
    #[serde(default)]
    supply_data: Option<Value>,
}

#[derive(Debug, Serialize)]
struct LogstatEnvelope {
    report_type: &'static str,
    report_data: LogstatReport,
    dtg: String,
    unit: String,
}

fn generate_logstat_report(args: &Value, _rng: &mut StdRng) -> Result<Value, ToolError> {
    const NAME: &str = "generate_logstat_report";
    let params: LogstatParams = parse_args(NAME, args)?;

    let dtg = Timestamp::now().to_dtg();
    let supply_data = params.supply_data.as_ref().filter(|v| !v.is_null());
    let report = build_logstat(&params.unit, &params.issue_description, supply_data, dtg.clone());
    to_json(
        NAME,
        &LogstatEnvelope {
            report_type: "LOGSTAT",
            report_data: report,
            dtg,
            unit: params.unit,
        },
    )
}

pub(super) fn specs() -> Vec<ToolSpec> {
    let string = json!({"type": "string"});
    vec![
        ToolSpec::new(
            ToolDefinition::new(
                "check_supply_inventory",
                Section::S4,
                "Check supply inventory levels for a specific unit and supply type.",
                json!({
                    "type": "object",
                    "required": ["unit", "supply_type"],
                    "properties": {
                        "unit": string,
                        "supply_type": {"type": "string", "description": "MREs, 5.56mm, 7.62mm, fuel, water or medical"}
                    }
                }),
            ),
            check_supply_inventory,
        ),
        ToolSpec::new(
            ToolDefinition::new(
                "check_vehicle_status",
                Section::S4,
                "Check vehicle and equipment readiness status.",
                json!({
                    "type": "object",
                    "required": ["vehicle_type", "unit"],
                    "properties": {
                        "vehicle_type": {"type": "string", "description": "LAV, HMMWV, MTVR or AAV"},
                        "unit": string
                    }
                }),
            ),
            check_vehicle_status,
        ),
        ToolSpec::new(
            ToolDefinition::new(
                "request_resupply",
                Section::S4,
                "Initiate a resupply request for a unit.",
                json!({
                    "type": "object",
                    "required": ["unit", "supply_type", "quantity", "priority"],
                    "properties": {
                        "unit": string,
                        "supply_type": string,
                        "quantity": {"type": "integer"},
                        "priority": {"type": "string", "enum": ["urgent", "priority", "routine"]}
                    }
                }),
            ),
            request_resupply,
        ),
        ToolSpec::new(
            ToolDefinition::new(
                "calculate_sustainment",
                Section::S4,
                "Compute rough sustainment requirements (MREs and fuel) for a duration. Combine \
                 with check_supply_inventory to decide whether resupply is needed.",
                json!({
                    "type": "object",
                    "required": ["unit", "personnel_count", "duration_hours"],
                    "properties": {
                        "unit": string,
                        "personnel_count": {"type": "integer"},
                        "duration_hours": {"type": "integer"},
                        "mres_per_day_per_person": {"type": "number", "default": 3.0},
                        "fuel_gallons_per_hour": {"type": "number", "default": 50.0}
                    }
                }),
            ),
            calculate_sustainment,
        ),
        ToolSpec::new(
            ToolDefinition::new(
                "generate_logstat_report",
                Section::S4,
                "Generate a LOGSTAT (logistics status) report.",
                json!({
                    "type": "object",
                    "required": ["unit", "issue_description"],
                    "properties": {
                        "unit": string,
                        "issue_description": string,
                        "supply_data": {"type": "object", "description": "Current supply status, e.g. {mres: {quantity}, fuel: {quantity}}"}
                    }
                }),
            ),
            generate_logstat_report,
        ),
    ]
}

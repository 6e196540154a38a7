//! Operations-style feasibility report text.

use super::snapshots::{format_number, FeasibilityInput, SupplySnapshot};
use super::Decision;

const TEXT_PLACEHOLDER: &str = "N/A";
const VALUE_PLACEHOLDER: &str = "?";

const RECOMMENDATIONS: [&str; 3] = [
    "If shortfall, submit PRIORITY resupply and align delivery with L-H hour",
    "Align movements with best weather/visibility windows",
    "Verify ALT comms checks prior to SP; rehearse PACE",
];

fn text(field: Option<&str>) -> &str {
    field.unwrap_or(TEXT_PLACEHOLDER)
}

fn status(field: Option<&str>) -> &str {
    field.unwrap_or(VALUE_PLACEHOLDER)
}

fn number(field: Option<f64>) -> String {
    field.map_or_else(|| VALUE_PLACEHOLDER.to_string(), format_number)
}

fn supply_line(label: &str, supply: &SupplySnapshot) -> String {
    format!(
        "  {label}: {} {} @ {}",
        number(supply.quantity),
        supply.unit.as_deref().unwrap_or(""),
        supply.location.as_deref().unwrap_or("")
    )
}

/// Renders the fixed-order S-3 feasibility report.
///
/// Absent fields are written as `N/A` for descriptive text and `?` for
/// measured values, so rendering never fails.
pub fn render_narrative(
    input: &FeasibilityInput,
    score: i32,
    decision: Decision,
    sustainment_ok: bool,
) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(20);

    lines.push(format!(
        "[S-3 OPERATIONS] FEASIBILITY - {}",
        input.operation_name
    ));
    lines.push(format!(
        "AO: {} | SP: {} | DUR: {} hrs",
        input.grid_reference, input.start_time_zulu, input.duration_hours
    ));
    lines.push(String::new());

    let weather = &input.weather;
    let terrain = &input.terrain;
    let threat = &input.threat;
    lines.push("S-2 SUMMARY:".to_string());
    lines.push(format!(
        "  Weather: {}, {}F, wind {} mph, vis {} m",
        text(weather.condition.as_deref()),
        number(weather.temperature_f),
        number(weather.wind_speed_mph),
        number(weather.visibility_meters)
    ));
    lines.push(format!(
        "  Terrain: {}, mobility {}",
        text(terrain.primary_terrain.as_deref()),
        text(terrain.mobility_assessment.as_deref())
    ));
    lines.push(format!(
        "  Threat: {} - {}",
        text(threat.threat_level.as_deref()),
        threat.recommended_posture.as_deref().unwrap_or("")
    ));
    lines.push(String::new());

    let readiness = &input.readiness;
    let vehicles = &input.vehicles;
    let comms = &input.comms;
    lines.push("S-3 SUMMARY:".to_string());
    lines.push(format!(
        "  Readiness: personnel {}, equipment {}",
        text(readiness.personnel_readiness.as_deref()),
        text(readiness.equipment_readiness.as_deref())
    ));
    lines.push(format!(
        "  Vehicles: operational {}/{}",
        number(vehicles.operational),
        number(vehicles.total)
    ));
    lines.push(format!(
        "  Comms: PRI {}, ALT {}",
        status(comms.primary_status.as_deref()),
        status(comms.alternate_status.as_deref())
    ));
    lines.push(String::new());

    lines.push("S-4 SUMMARY:".to_string());
    lines.push(supply_line("MREs", &input.supply_mres));
    lines.push(supply_line("Fuel", &input.supply_fuel));
    if let Some(required) = &input.sustainment {
        lines.push(format!(
            "  Requirements (est.): {} MREs, {} gal fuel",
            number(required.mres_required),
            number(required.fuel_required_gallons)
        ));
    }
    lines.push(String::new());

    lines.push(format!(
        "DECISION: {decision} (score {score}/10) | Sustainment OK: {}",
        if sustainment_ok { "YES" } else { "NO" }
    ));
    lines.push("RECOMMENDATIONS:".to_string());
    lines.extend(RECOMMENDATIONS.iter().map(|r| format!("  - {r}")));

    lines.join("\n")
}

//! Follow-on status reports: LOGSTAT, PERSTAT and SALUTE-format SPOT.
//!
//! Reports are built as plain records. Rendering them to a document is left
//! to whoever consumes them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ReportType;

pub const REPORT_CLASSIFICATION: &str = "UNCLASSIFIED//FOUO";

/// Traffic-light status used across report sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusColor {
    Green,
    Amber,
    Red,
    Black,
}

/// Fully, substantially, marginally or not operational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEffectiveness {
    #[serde(rename = "FO")]
    FullyOperational,
    #[serde(rename = "SO")]
    SubstantiallyOperational,
    #[serde(rename = "MO")]
    MarginallyOperational,
    #[serde(rename = "NO")]
    NotOperational,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyClassStatus {
    pub on_hand: f64,
    pub required: f64,
    pub status: StatusColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub status: StatusColor,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogstatReport {
    pub report_type: ReportType,
    pub unit: String,
    pub dtg: String,
    pub classification: String,
    pub reporting_period: String,
    pub supply_classes: BTreeMap<String, SupplyClassStatus>,
    pub combat_effectiveness: CombatEffectiveness,
    pub days_of_supply: BTreeMap<String, u32>,
    pub shortfalls: Vec<String>,
    pub projections_24h: Projection,
    pub projections_48h: Projection,
    pub projections_72h: Projection,
    pub narrative: String,
    pub recommendations: Vec<String>,
    pub prepared_by: String,
}

fn on_hand(supply_data: Option<&Value>, item: &str, default: f64) -> f64 {
    match supply_data {
        Some(data) => data
            .get(item)
            .and_then(|entry| entry.get("quantity"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        None => default,
    }
}

/// Builds a LOGSTAT. A fuel issue marks Class III red and drops the unit to
/// marginally operational.
pub fn build_logstat(
    unit: &str,
    issue_description: &str,
    supply_data: Option<&Value>,
    dtg: String,
) -> LogstatReport {
    let fuel_issue = issue_description.to_lowercase().contains("fuel");

    let supply_classes = BTreeMap::from([
        (
            "Class I (Subsistence)".to_string(),
            SupplyClassStatus {
                on_hand: on_hand(supply_data, "mres", 1200.0),
                required: 1500.0,
                status: StatusColor::Amber,
            },
        ),
        (
            "Class III (POL)".to_string(),
            SupplyClassStatus {
                on_hand: on_hand(supply_data, "fuel", 2500.0),
                required: 3000.0,
                status: if fuel_issue {
                    StatusColor::Red
                } else {
                    StatusColor::Green
                },
            },
        ),
        (
            "Class V (Ammunition)".to_string(),
            SupplyClassStatus {
                on_hand: 15000.0,
                required: 10000.0,
                status: StatusColor::Green,
            },
        ),
        (
            "Class IX (Repair Parts)".to_string(),
            SupplyClassStatus {
                on_hand: 85.0,
                required: 100.0,
                status: StatusColor::Amber,
            },
        ),
    ]);

    let days_of_supply = BTreeMap::from([
        ("MREs".to_string(), 5),
        ("Fuel".to_string(), if fuel_issue { 2 } else { 7 }),
        ("Water".to_string(), 3),
        ("Ammunition".to_string(), 14),
    ]);

    let shortfalls = if issue_description.is_empty() {
        Vec::new()
    } else {
        vec![issue_description.to_string()]
    };

    LogstatReport {
        report_type: ReportType::Logstat,
        unit: unit.to_string(),
        dtg,
        classification: REPORT_CLASSIFICATION.to_string(),
        reporting_period: "Past 24 hours".to_string(),
        supply_classes,
        combat_effectiveness: if fuel_issue {
            CombatEffectiveness::MarginallyOperational
        } else {
            CombatEffectiveness::FullyOperational
        },
        days_of_supply,
        shortfalls,
        projections_24h: Projection {
            status: StatusColor::Amber,
            notes: "Resupply required".to_string(),
        },
        projections_48h: Projection {
            status: StatusColor::Red,
            notes: "Critical shortfalls expected".to_string(),
        },
        projections_72h: Projection {
            status: StatusColor::Black,
            notes: "Mission capability compromised".to_string(),
        },
        narrative: format!(
            "[S-4 LOGISTICS] {issue_description}. Current supply posture indicates {unit} has \
             LIMITED operational capability. Immediate resupply required to maintain mission readiness."
        ),
        recommendations: vec![
            "Submit PRIORITY resupply request for Class III (POL)".to_string(),
            "Reduce non-essential vehicle movements".to_string(),
            "Implement fuel conservation measures".to_string(),
            "Coordinate with adjacent units for emergency supply transfer".to_string(),
        ],
        prepared_by: "S-4 OPS".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerstatReport {
    pub report_type: ReportType,
    pub unit: String,
    pub dtg: String,
    pub classification: String,
    pub reporting_period: String,
    pub authorized: u32,
    pub assigned: u32,
    pub present_for_duty: u32,
    pub on_leave: u32,
    pub sick_call: u32,
    pub awol: u32,
    pub casualties: u32,
    pub gains: u32,
    pub losses: u32,
    pub readiness_percent: f64,
    pub limiting_factors: Vec<String>,
    pub narrative: String,
    pub prepared_by: String,
}

pub const DEFAULT_AUTHORIZED: u32 = 145;
pub const DEFAULT_ASSIGNED: u32 = 138;
pub const DEFAULT_PRESENT: u32 = 132;

fn headcount(personnel_data: Option<&Value>, key: &str, default: u32) -> u32 {
    personnel_data
        .and_then(|data| data.get(key))
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(default)
}

/// Builds a PERSTAT. Readiness is present-for-duty over authorized strength.
pub fn build_perstat(
    unit: &str,
    personnel_issue: Option<&str>,
    personnel_data: Option<&Value>,
    dtg: String,
) -> PerstatReport {
    let authorized = headcount(personnel_data, "authorized", DEFAULT_AUTHORIZED);
    let assigned = headcount(personnel_data, "assigned", DEFAULT_ASSIGNED);
    let present = headcount(personnel_data, "present", DEFAULT_PRESENT);
    let issue = personnel_issue.filter(|i| !i.trim().is_empty());

    let readiness_percent = if authorized == 0 {
        0.0
    } else {
        f64::from(present) / f64::from(authorized) * 100.0
    };

    PerstatReport {
        report_type: ReportType::Perstat,
        unit: unit.to_string(),
        dtg,
        classification: REPORT_CLASSIFICATION.to_string(),
        reporting_period: "0001Z-2359Z".to_string(),
        authorized,
        assigned,
        present_for_duty: present,
        on_leave: 3,
        sick_call: 2,
        awol: 1,
        casualties: 0,
        gains: 0,
        losses: if issue.is_some() { 2 } else { 0 },
        readiness_percent,
        limiting_factors: vec![issue.unwrap_or("None").to_string()],
        narrative: format!(
            "[S-1 PERSONNEL] {unit} currently at {present}/{authorized} strength. {}",
            issue.unwrap_or("Unit maintains acceptable readiness level.")
        ),
        prepared_by: "S-1 CHIEF".to_string(),
    }
}

/// SALUTE observation: size, activity, location, unit, time, equipment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaluteObservation {
    pub size: String,
    pub activity: String,
    pub location: String,
    pub enemy_unit: String,
    pub time_observed: String,
    pub equipment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotReport {
    pub report_type: ReportType,
    pub unit: String,
    pub dtg: String,
    pub classification: String,
    pub size: String,
    pub activity: String,
    pub location: String,
    pub unit_identification: String,
    pub time_observed: String,
    pub equipment: String,
    pub narrative: String,
    pub threat_assessment: String,
    pub recommended_actions: Vec<String>,
    pub prepared_by: String,
}

pub fn build_spot(reporting_unit: &str, observation: SaluteObservation, dtg: String) -> SpotReport {
    let narrative = format!(
        "[S-2 INTELLIGENCE] ENEMY CONTACT. {} observed conducting {} at grid {} at {}. \
         Unit assessed as {}. Equipment observed: {}.",
        observation.size,
        observation.activity,
        observation.location,
        observation.time_observed,
        observation.enemy_unit,
        observation.equipment
    );

    SpotReport {
        report_type: ReportType::Spot,
        unit: reporting_unit.to_string(),
        dtg,
        classification: REPORT_CLASSIFICATION.to_string(),
        size: observation.size,
        activity: observation.activity,
        location: observation.location,
        unit_identification: observation.enemy_unit,
        time_observed: observation.time_observed,
        equipment: observation.equipment,
        narrative,
        threat_assessment: "MODERATE - Enemy presence confirmed in AO. Likely reconnaissance element."
            .to_string(),
        recommended_actions: vec![
            "Increase force protection posture".to_string(),
            "Deploy QRF to grid vicinity".to_string(),
            "Request ISR coverage of area".to_string(),
            "Alert adjacent units".to_string(),
        ],
        prepared_by: "S-2 WATCH".to_string(),
    }
}

/// Precedence of a report submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Precedence {
    #[default]
    Routine,
    Priority,
    Immediate,
}

impl Precedence {
    /// Unknown text falls back to ROUTINE.
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_uppercase().as_str() {
            "IMMEDIATE" => Precedence::Immediate,
            "PRIORITY" => Precedence::Priority,
            _ => Precedence::Routine,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Precedence::Routine => "ROUTINE",
            Precedence::Priority => "PRIORITY",
            Precedence::Immediate => "IMMEDIATE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub status: String,
    pub confirmation_number: String,
    pub report_type: String,
    pub destination: String,
    pub priority: Precedence,
    pub timestamp: String,
    pub message: String,
    pub estimated_processing: String,
}

/// Simulated transmission to higher headquarters.
pub fn submit_report(
    report_type: &str,
    destination: &str,
    priority: Precedence,
    confirmation_seq: u32,
    dtg: String,
) -> SubmissionReceipt {
    let confirmation_number = format!("RPT-{confirmation_seq:04}");
    SubmissionReceipt {
        status: "SUBMITTED".to_string(),
        message: format!(
            "{report_type} successfully transmitted to {destination}. Confirmation: \
             {confirmation_number}. Receipt acknowledged by {destination} WATCHSTANDER."
        ),
        confirmation_number,
        report_type: report_type.to_string(),
        destination: destination.to_string(),
        priority,
        timestamp: dtg,
        estimated_processing: match priority {
            Precedence::Immediate => "30 minutes",
            _ => "2-4 hours",
        }
        .to_string(),
    }
}

//! S-1 personnel tools.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::catalog::{parse_args, to_json, ToolSpec};
use super::{ToolDefinition, ToolError};
use crate::domain::decision_package::{build_perstat, PerstatReport};
use crate::domain::foundation::Timestamp;
use crate::domain::telemetry::Section;

#[derive(Debug, Deserialize)]
struct PerstatParams {
    unit: String,
    #[serde(default)]
    personnel_issue: Option<String>,
    #[serde(default)]
    personnel_data: Option<Value>,
}

#[derive(Debug, Serialize)]
struct PerstatEnvelope {
    report_type: &'static str,
    readiness_percent: f64,
    report_data: PerstatReport,
    dtg: String,
    unit: String,
}

fn generate_perstat_report(args: &Value, _rng: &mut StdRng) -> Result<Value, ToolError> {
    const NAME: &str = "generate_perstat_report";
    let params: PerstatParams = parse_args(NAME, args)?;

    let dtg = Timestamp::now().to_dtg();
    let report = build_perstat(
        &params.unit,
        params.personnel_issue.as_deref(),
        params.personnel_data.as_ref().filter(|v| !v.is_null()),
        dtg.clone(),
    );
    to_json(
        NAME,
        &PerstatEnvelope {
            report_type: "PERSTAT",
            readiness_percent: report.readiness_percent,
            report_data: report,
            dtg,
            unit: params.unit,
        },
    )
}

pub(super) fn specs() -> Vec<ToolSpec> {
    vec![ToolSpec::new(
        ToolDefinition::new(
            "generate_perstat_report",
            Section::S1,
            "Generate a PERSTAT (personnel status) report.",
            json!({
                "type": "object",
                "required": ["unit"],
                "properties": {
                    "unit": {"type": "string"},
                    "personnel_issue": {"type": "string"},
                    "personnel_data": {"type": "object", "description": "authorized, assigned and present counts"}
                }
            }),
        ),
        generate_perstat_report,
    )]
}

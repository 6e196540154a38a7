//! FRAGO decision package synthesis.
//!
//! Scored on its own 10-point penalty scale, independent of the feasibility
//! calculator. The two scores are never reconciled.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::feasibility::Decision;
use crate::domain::foundation::Timestamp;

pub const BASE_SCORE: i32 = 10;
pub const GO_THRESHOLD: i32 = 8;
pub const CAVEATS_THRESHOLD: i32 = 6;

/// Keyword penalties. An issue matching several keywords pays each one.
pub const ISSUE_PENALTIES: [(&str, i32); 3] = [("fuel", 3), ("vehicle", 2), ("personnel", 2)];

/// Follow-on status reports a package can call for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportType {
    Logstat,
    Perstat,
    Spot,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Logstat => "LOGSTAT",
            ReportType::Perstat => "PERSTAT",
            ReportType::Spot => "SPOT",
        }
    }

    /// Issue keywords that trigger this report.
    pub fn triggers(&self) -> &'static [&'static str] {
        match self {
            ReportType::Logstat => &["fuel", "supply"],
            ReportType::Perstat => &["personnel", "casualty"],
            ReportType::Spot => &["enemy", "contact"],
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_uppercase().as_str() {
            "LOGSTAT" => Some(ReportType::Logstat),
            "PERSTAT" => Some(ReportType::Perstat),
            "SPOT" => Some(ReportType::Spot),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskAssessment {
    Moderate,
    High,
}

/// A constraint carried into the package, one per reported issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(rename = "type")]
    pub kind: String,
    pub issue: String,
}

impl Constraint {
    pub fn logistics(issue: impl Into<String>) -> Self {
        Self {
            kind: "logistics".to_string(),
            issue: issue.into(),
        }
    }
}

/// Inputs to [`generate_decision_package`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionRequest {
    pub frago_id: String,
    pub mission_summary: String,
    /// Accepted for symmetry with the staff workflow; not scored.
    pub assessments: Value,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

impl DecisionRequest {
    /// Builds a request from a tool-call argument object. Missing or
    /// mistyped fields fall back to empty values and non-text list entries
    /// are skipped, so a package is always produced.
    pub fn from_arguments(args: &Value) -> Self {
        Self {
            frago_id: text_arg(args, "frago_id"),
            mission_summary: text_arg(args, "mission_summary"),
            assessments: args.get("assessments").cloned().unwrap_or(Value::Null),
            issues: text_list_arg(args, "issues"),
            recommendations: text_list_arg(args, "recommendations"),
        }
    }
}

fn text_arg(args: &Value, key: &str) -> String {
    match args.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn text_list_arg(args: &Value, key: &str) -> Vec<String> {
    args.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionPackage {
    pub frago_id: String,
    pub dtg: String,
    pub mission_summary: String,
    pub go_no_go: Decision,
    pub score: i32,
    pub constraints: Vec<Constraint>,
    pub required_reports: BTreeSet<ReportType>,
    pub recommendations: Vec<String>,
    pub risk_assessment: RiskAssessment,
}

/// Tool-facing wrapper around a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub decision: Decision,
    pub package: DecisionPackage,
    pub requires_immediate_action: bool,
}

/// Applies the keyword penalties to the base score of 10.
pub fn score_issues<S: AsRef<str>>(issues: &[S]) -> i32 {
    issues.iter().fold(BASE_SCORE, |score, issue| {
        let issue = issue.as_ref().to_lowercase();
        let penalty: i32 = ISSUE_PENALTIES
            .iter()
            .filter(|(keyword, _)| issue.contains(keyword))
            .map(|(_, penalty)| penalty)
            .sum();
        score - penalty
    })
}

pub fn decide(score: i32) -> Decision {
    if score >= GO_THRESHOLD {
        Decision::Go
    } else if score >= CAVEATS_THRESHOLD {
        Decision::GoWithCaveats
    } else {
        Decision::NoGo
    }
}

pub fn assess_risk(score: i32) -> RiskAssessment {
    if score >= CAVEATS_THRESHOLD {
        RiskAssessment::Moderate
    } else {
        RiskAssessment::High
    }
}

/// Report types whose trigger keywords appear in any issue.
pub fn required_reports<S: AsRef<str>>(issues: &[S]) -> BTreeSet<ReportType> {
    let lowered: Vec<String> = issues.iter().map(|i| i.as_ref().to_lowercase()).collect();
    [ReportType::Logstat, ReportType::Perstat, ReportType::Spot]
        .into_iter()
        .filter(|report| {
            lowered
                .iter()
                .any(|issue| report.triggers().iter().any(|kw| issue.contains(kw)))
        })
        .collect()
}

/// Builds the decision package for a FRAGO.
pub fn generate_decision_package(
    request: &DecisionRequest,
    issued_at: Timestamp,
) -> DecisionOutcome {
    let score = score_issues(&request.issues);
    let decision = decide(score);

    let package = DecisionPackage {
        frago_id: request.frago_id.clone(),
        dtg: issued_at.to_dtg(),
        mission_summary: request.mission_summary.clone(),
        go_no_go: decision,
        score,
        constraints: request.issues.iter().map(Constraint::logistics).collect(),
        required_reports: required_reports(&request.issues),
        recommendations: request.recommendations.clone(),
        risk_assessment: assess_risk(score),
    };

    DecisionOutcome {
        decision,
        package,
        requires_immediate_action: decision.is_no_go(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn request(issues: &[&str]) -> DecisionRequest {
        DecisionRequest {
            frago_id: "FRAGO-012".into(),
            mission_summary: "Seize OBJ ALPHA".into(),
            issues: issues.iter().map(|s| s.to_string()).collect(),
            recommendations: vec!["Request fuel resupply".into()],
            ..Default::default()
        }
    }

    #[test]
    fn fuel_and_personnel_issues_are_no_go() {
        let outcome = generate_decision_package(
            &request(&["fuel shortage", "personnel gap"]),
            Timestamp::now(),
        );

        assert_eq!(outcome.package.score, 5);
        assert_eq!(outcome.decision, Decision::NoGo);
        assert!(outcome.requires_immediate_action);
        assert_eq!(outcome.package.risk_assessment, RiskAssessment::High);
        assert!(outcome.package.required_reports.contains(&ReportType::Logstat));
        assert!(outcome.package.required_reports.contains(&ReportType::Perstat));
        assert!(!outcome.package.required_reports.contains(&ReportType::Spot));
    }

    #[test]
    fn one_issue_can_match_several_keywords() {
        assert_eq!(score_issues(&["Fuel and PERSONNEL shortfall"]), 5);
        assert_eq!(score_issues(&["fuel vehicle personnel"]), 3);
    }

    #[test]
    fn no_issues_is_go_with_moderate_risk() {
        let outcome = generate_decision_package(&request(&[]), Timestamp::now());
        assert_eq!(outcome.package.score, 10);
        assert_eq!(outcome.decision, Decision::Go);
        assert_eq!(outcome.package.risk_assessment, RiskAssessment::Moderate);
        assert!(outcome.package.required_reports.is_empty());
        assert!(!outcome.requires_immediate_action);
    }

    #[test]
    fn vehicle_issue_alone_is_go_and_two_are_caveats() {
        assert_eq!(decide(score_issues(&["vehicle down"])), Decision::Go);
        assert_eq!(
            decide(score_issues(&["vehicle down", "vehicle deadlined"])),
            Decision::GoWithCaveats
        );
    }

    #[test]
    fn every_issue_becomes_a_logistics_constraint() {
        let outcome = generate_decision_package(
            &request(&["enemy contact north", "bridge out"]),
            Timestamp::now(),
        );
        assert_eq!(
            outcome.package.constraints,
            vec![
                Constraint::logistics("enemy contact north"),
                Constraint::logistics("bridge out"),
            ]
        );
        assert_eq!(
            outcome.package.required_reports.iter().copied().collect::<Vec<_>>(),
            vec![ReportType::Spot]
        );
    }

    #[test]
    fn missing_identity_fields_become_empty() {
        let request = DecisionRequest::from_arguments(&json!({"issues": ["fuel low"]}));
        assert_eq!(request.frago_id, "");
        assert_eq!(request.mission_summary, "");

        let outcome = generate_decision_package(&request, Timestamp::now());
        assert_eq!(outcome.package.score, 7);
    }

    #[test]
    fn non_text_issues_are_skipped() {
        let request = DecisionRequest::from_arguments(&json!({
            "frago_id": "FRAGO-3",
            "issues": ["fuel low", 7, null, {"kind": "vehicle"}, "personnel short"]
        }));
        assert_eq!(request.issues, vec!["fuel low", "personnel short"]);
    }

    #[test]
    fn null_or_scalar_lists_are_empty() {
        let request = DecisionRequest::from_arguments(&json!({
            "frago_id": "FRAGO-4",
            "mission_summary": "Screen the flank",
            "issues": null,
            "recommendations": "resupply first"
        }));
        assert!(request.issues.is_empty());
        assert!(request.recommendations.is_empty());

        let outcome = generate_decision_package(&request, Timestamp::now());
        assert_eq!(outcome.decision, Decision::Go);
    }

    #[test]
    fn non_object_arguments_give_an_empty_request() {
        assert_eq!(DecisionRequest::from_arguments(&Value::Null), DecisionRequest::default());
    }

    #[test]
    fn required_reports_are_deduplicated() {
        let reports = required_reports(&["fuel low", "supply delayed", "casualty evac"]);
        assert_eq!(reports.len(), 2);
    }

    #[test]
    fn package_serializes_with_wire_labels() {
        let outcome = generate_decision_package(&request(&["fuel shortage"]), Timestamp::now());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["decision"], "GO WITH CAVEATS");
        assert_eq!(json["package"]["required_reports"][0], "LOGSTAT");
        assert_eq!(json["package"]["constraints"][0]["type"], "logistics");
        assert_eq!(json["package"]["risk_assessment"], "MODERATE");
    }

    proptest! {
        #[test]
        fn score_drops_by_the_sum_of_matched_penalties(
            fuel in 0usize..3,
            vehicle in 0usize..3,
            personnel in 0usize..3
        ) {
            let mut issues = Vec::new();
            issues.extend(std::iter::repeat("fuel low").take(fuel));
            issues.extend(std::iter::repeat("vehicle down").take(vehicle));
            issues.extend(std::iter::repeat("personnel short").take(personnel));

            let expected = BASE_SCORE - 3 * fuel as i32 - 2 * vehicle as i32 - 2 * personnel as i32;
            prop_assert_eq!(score_issues(&issues), expected);
        }

        #[test]
        fn risk_is_moderate_exactly_when_not_no_go(score in -20i32..12) {
            let moderate = assess_risk(score) == RiskAssessment::Moderate;
            prop_assert_eq!(moderate, !decide(score).is_no_go());
        }
    }
}

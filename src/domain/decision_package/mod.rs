//! Decision packages for FRAGO-style orders and the follow-on reports they
//! can call for.

mod package;
mod reports;

pub use package::{
    assess_risk, decide, generate_decision_package, required_reports, score_issues, Constraint,
    DecisionOutcome, DecisionPackage, DecisionRequest, ReportType, RiskAssessment, BASE_SCORE,
    ISSUE_PENALTIES,
};
pub use reports::{
    build_logstat, build_perstat, build_spot, submit_report, CombatEffectiveness, LogstatReport,
    PerstatReport, Precedence, Projection, SaluteObservation, SpotReport, StatusColor,
    SubmissionReceipt, SupplyClassStatus, REPORT_CLASSIFICATION,
};

//! Domain layer containing the assistant's pure logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, errors)
//! - `telemetry` - Tool events, the observer seam and the monitoring wrapper
//! - `feasibility` - Multi-factor GO / NO-GO scoring and its narrative
//! - `decision_package` - FRAGO decision packages and follow-on reports
//! - `tools` - The staff tool set exposed to the agent
//! - `guardrails` - Pre-flight security checks on user input
//! - `conversation` - Bounded history and agent output handling
//! - `run` - Per-query run records, the run registry and session statistics

pub mod conversation;
pub mod decision_package;
pub mod feasibility;
pub mod foundation;
pub mod guardrails;
pub mod run;
pub mod telemetry;
pub mod tools;

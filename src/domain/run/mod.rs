//! Run/session correlation.
//!
//! A [`Run`] groups the tool telemetry of one query. Runs live in the
//! [`RunRegistry`]; the id of the run being processed is bound to the
//! processing task through [`with_run`], and read back with
//! [`current_run`] when a tool event needs attributing.

mod context;
mod registry;
#[allow(clippy::module_inception)]
mod run;
mod stats;

pub use context::{current_run, with_run, with_run_sync};
pub use registry::{RunRegistry, DEFAULT_RUN_CAPACITY};
pub use run::{RecordOutcome, Run, RunStatus, ToolRecord};
pub use stats::{SessionStats, StatsTracker};

//! Domain tool set.
//!
//! Each staff section contributes mock capability functions that return
//! structured status records. Tools are plain functions over JSON arguments;
//! the [`ToolSet`] owns lookup and wraps every call with telemetry.

mod catalog;
mod definition;
mod error;
mod intelligence;
mod logistics;
mod operations;
mod personnel;
mod toolset;

pub use catalog::{ToolHandler, ToolSpec};
pub use definition::ToolDefinition;
pub use error::ToolError;
pub use logistics::sustainment_days;
pub use toolset::{ToolInfo, ToolSet, ToolsBySection};

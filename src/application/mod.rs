//! Application layer - command handlers and the state they share.
//!
//! Handlers orchestrate domain operations and coordinate between ports;
//! they hold no logic of their own beyond sequencing and error mapping.

mod assistant;
pub mod handlers;
pub mod instructions;
mod run_recorder;
mod services;

pub use assistant::{Assistant, AssistantSettings, DEFAULT_FRAGO_MAX_TURNS};
pub use handlers::{
    AddContextCommand, AddContextError, AddContextHandler, AddContextResult, ClearHistoryCommand,
    ClearHistoryHandler, ClearHistoryResult, DispatchCommand, DispatchQueryHandler,
    DispatchResult, ProcessFragoCommand, ProcessFragoHandler, ProcessQueryCommand,
    ProcessQueryError, ProcessQueryHandler, QueryOutcome, DEFAULT_PREVIEW_CHARS,
};
pub use run_recorder::RunRecorder;
pub use services::{AssistantServices, ServiceOptions};

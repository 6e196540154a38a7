//! Command handlers for the operations assistant.
//!
//! - Query processing: [`ProcessQueryHandler`], [`ProcessFragoHandler`]
//! - History: [`ClearHistoryHandler`], [`AddContextHandler`]
//! - Run lifecycle: [`DispatchQueryHandler`]

mod add_context;
mod clear_history;
mod dispatch_query;
mod process_frago;
mod process_query;

pub use add_context::{AddContextCommand, AddContextError, AddContextHandler, AddContextResult};
pub use clear_history::{ClearHistoryCommand, ClearHistoryHandler, ClearHistoryResult};
pub use dispatch_query::{
    DispatchCommand, DispatchQueryHandler, DispatchResult, DEFAULT_PREVIEW_CHARS,
};
pub use process_frago::{ProcessFragoCommand, ProcessFragoHandler};
pub use process_query::{ProcessQueryCommand, ProcessQueryError, ProcessQueryHandler, QueryOutcome};

//! Conversation state shared by the orchestration handlers.

mod history;
mod output;

pub use history::{
    ConversationHistory, Role, Turn, DEFAULT_HISTORY_CAPACITY, DEFAULT_HISTORY_WINDOW,
};
pub use output::{value_to_text, AgentOutput};

//! AddContext command handler.

use std::sync::Arc;

use thiserror::Error;

use crate::application::assistant::Assistant;
use crate::domain::conversation::{Role, Turn};
use crate::domain::foundation::ValidationError;

/// Command to add a context turn to history (system role by default).
#[derive(Debug, Clone)]
pub struct AddContextCommand {
    pub content: String,
    pub role: Role,
}

impl AddContextCommand {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            role: Role::System,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

#[derive(Debug, Clone, Error)]
pub enum AddContextError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
pub struct AddContextResult {
    pub history_len: usize,
}

/// Handler for AddContext commands.
pub struct AddContextHandler {
    assistant: Arc<Assistant>,
}

impl AddContextHandler {
    pub fn new(assistant: Arc<Assistant>) -> Self {
        Self { assistant }
    }

    pub fn handle(&self, cmd: AddContextCommand) -> Result<AddContextResult, AddContextError> {
        if cmd.content.trim().is_empty() {
            return Err(ValidationError::empty_field("content").into());
        }

        let mut history = self.assistant.lock_history();
        history.push(Turn::new(cmd.role, cmd.content));
        Ok(AddContextResult {
            history_len: history.len(),
        })
    }
}

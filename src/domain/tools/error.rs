use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Failure of a domain tool call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("{tool} failed: {message}")]
    ExecutionFailed { tool: String, message: String },
}

impl ToolError {
    pub fn invalid(tool: &str, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.to_string(),
            message: message.into(),
        }
    }

    pub fn failed(tool: &str, message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            tool: tool.to_string(),
            message: message.into(),
        }
    }

    pub fn tool_name(&self) -> &str {
        match self {
            Self::UnknownTool(name) => name,
            Self::InvalidArguments { tool, .. } | Self::ExecutionFailed { tool, .. } => tool,
        }
    }
}

impl From<ToolError> for DomainError {
    fn from(err: ToolError) -> Self {
        let code = match &err {
            ToolError::UnknownTool(_) => ErrorCode::ToolNotFound,
            ToolError::InvalidArguments { .. } => ErrorCode::ValidationFailed,
            ToolError::ExecutionFailed { .. } => ErrorCode::ToolFailed,
        };
        DomainError::new(code, err.to_string())
    }
}

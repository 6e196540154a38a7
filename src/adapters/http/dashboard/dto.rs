//! HTTP DTOs for the dashboard API.
//!
//! Run and statistics records are already designed for serialization, so
//! they are returned as-is; requests and envelopes are defined here.

use serde::{Deserialize, Serialize};

use crate::application::{DispatchResult, QueryOutcome};
use crate::domain::conversation::Role;
use crate::domain::foundation::RunId;
use crate::domain::guardrails::GuardrailCategory;
use crate::domain::run::{Run, SessionStats};
use crate::domain::tools::ToolsBySection;
use crate::ports::RuntimeInfo;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FragoRequest {
    pub frago_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContextRequest {
    pub content: String,
    #[serde(default)]
    pub role: Option<Role>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Answer to a dispatched query or FRAGO.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub run_id: RunId,
    pub success: bool,
    pub response: String,
    pub response_time: f64,
    pub guardrail_triggered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardrail_category: Option<GuardrailCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<DispatchResult> for QueryResponse {
    fn from(result: DispatchResult) -> Self {
        let success = result.outcome.is_success();
        let (guardrail_category, error) = match &result.outcome {
            QueryOutcome::Completed { .. } => (None, None),
            QueryOutcome::Blocked { category, .. } => (Some(*category), None),
            QueryOutcome::Failed { error, .. } => (None, Some(error.clone())),
        };
        Self {
            run_id: result.run_id,
            success,
            response: result.outcome.response().to_string(),
            response_time: result.response_time,
            guardrail_triggered: guardrail_category.is_some(),
            guardrail_category,
            error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearHistoryResponse {
    pub cleared_turns: usize,
    pub stats: SessionStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContextResponse {
    pub history_len: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunsResponse {
    pub count: usize,
    pub runs: Vec<Run>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolsResponse {
    pub count: usize,
    pub sections: ToolsBySection,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub runtime: RuntimeInfo,
    pub runs_retained: usize,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_request_role_is_optional() {
        let req: ContextRequest = serde_json::from_str(r#"{"content": "2/5 in reserve"}"#).unwrap();
        assert!(req.role.is_none());

        let req: ContextRequest =
            serde_json::from_str(r#"{"content": "x", "role": "assistant"}"#).unwrap();
        assert_eq!(req.role, Some(Role::Assistant));
    }

    #[test]
    fn blocked_dispatch_maps_to_guardrail_response() {
        let result = DispatchResult {
            run_id: RunId::new(),
            outcome: QueryOutcome::blocked(GuardrailCategory::Pii),
            response_time: 0.01,
            run: None,
        };

        let response = QueryResponse::from(result);

        assert!(!response.success);
        assert!(response.guardrail_triggered);
        assert_eq!(
            response.response,
            "[SECURITY BLOCK] PII PROTECTION: Personal information request blocked."
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["guardrail_category"], "pii");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn error_response_not_found() {
        let error = ErrorResponse::not_found("Run", "abc");
        assert_eq!(error.code, "NOT_FOUND");
        assert_eq!(error.message, "Run not found: abc");
    }
}

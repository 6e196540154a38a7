//! HTTP handlers for dashboard endpoints.
//!
//! These handlers connect Axum routes to the assistant's application handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::telemetry::BroadcastSink;
use crate::application::{
    AddContextCommand, AddContextError, AssistantServices, ClearHistoryCommand, DispatchCommand,
};
use crate::domain::foundation::RunId;
use crate::domain::run::SessionStats;

use super::dto::{
    ClearHistoryResponse, ContextRequest, ContextResponse, ErrorResponse, FragoRequest,
    HealthResponse, QueryRequest, QueryResponse, RunsResponse, ToolsResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Error Type
// ════════════════════════════════════════════════════════════════════════════════

/// Dashboard API error that implements IntoResponse.
#[derive(Debug)]
pub enum DashboardApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for DashboardApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            DashboardApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            DashboardApiError::NotFound(id) => {
                (StatusCode::NOT_FOUND, ErrorResponse::not_found("Run", &id))
            }
            DashboardApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal(msg))
            }
        };
        (status, Json(error)).into_response()
    }
}

impl From<AddContextError> for DashboardApiError {
    fn from(error: AddContextError) -> Self {
        match error {
            AddContextError::Validation(err) => DashboardApiError::BadRequest(err.to_string()),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the dashboard API and the live feed.
#[derive(Clone)]
pub struct DashboardAppState {
    pub services: AssistantServices,
    pub telemetry: Arc<BroadcastSink>,
}

impl DashboardAppState {
    pub fn new(services: AssistantServices, telemetry: Arc<BroadcastSink>) -> Self {
        Self { services, telemetry }
    }
}

fn require_text(field: &str, value: &str) -> Result<(), DashboardApiError> {
    if value.trim().is_empty() {
        return Err(DashboardApiError::BadRequest(format!("{} cannot be empty", field)));
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/query
pub async fn submit_query(
    State(state): State<DashboardAppState>,
    Json(request): Json<QueryRequest>,
) -> Result<impl IntoResponse, DashboardApiError> {
    require_text("query", &request.query)?;

    let result = state
        .services
        .dispatcher
        .handle(DispatchCommand::Query(request.query))
        .await;

    Ok(Json(QueryResponse::from(result)))
}

/// POST /api/frago
pub async fn submit_frago(
    State(state): State<DashboardAppState>,
    Json(request): Json<FragoRequest>,
) -> Result<impl IntoResponse, DashboardApiError> {
    require_text("frago_text", &request.frago_text)?;

    let result = state
        .services
        .dispatcher
        .handle(DispatchCommand::Frago(request.frago_text))
        .await;

    Ok(Json(QueryResponse::from(result)))
}

/// POST /api/history/clear
pub async fn clear_history(State(state): State<DashboardAppState>) -> impl IntoResponse {
    let result = state.services.clear_history.handle(ClearHistoryCommand);
    Json(ClearHistoryResponse {
        cleared_turns: result.cleared_turns,
        stats: result.stats,
    })
}

/// POST /api/history/context
pub async fn add_context(
    State(state): State<DashboardAppState>,
    Json(request): Json<ContextRequest>,
) -> Result<impl IntoResponse, DashboardApiError> {
    let mut cmd = AddContextCommand::new(request.content);
    if let Some(role) = request.role {
        cmd = cmd.with_role(role);
    }

    let result = state.services.add_context.handle(cmd)?;

    Ok((
        StatusCode::CREATED,
        Json(ContextResponse {
            history_len: result.history_len,
        }),
    ))
}

/// GET /api/runs
pub async fn list_runs(State(state): State<DashboardAppState>) -> impl IntoResponse {
    let runs = state.services.registry.list();
    Json(RunsResponse {
        count: runs.len(),
        runs,
    })
}

/// GET /api/runs/:run_id
pub async fn get_run(
    State(state): State<DashboardAppState>,
    Path(run_id): Path<String>,
) -> Result<impl IntoResponse, DashboardApiError> {
    let id: RunId = run_id
        .parse()
        .map_err(|_| DashboardApiError::BadRequest(format!("Invalid run ID: {}", run_id)))?;

    state
        .services
        .registry
        .get(id)
        .map(Json)
        .ok_or(DashboardApiError::NotFound(run_id))
}

/// GET /api/stats
pub async fn get_stats(State(state): State<DashboardAppState>) -> Json<SessionStats> {
    Json(state.services.stats.snapshot())
}

/// GET /api/tools
pub async fn list_tools(State(state): State<DashboardAppState>) -> impl IntoResponse {
    let tools = state.services.assistant.tools();
    Json(ToolsResponse {
        count: tools.len(),
        sections: tools.tools_info(),
    })
}

/// GET /health
pub async fn health(State(state): State<DashboardAppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        runtime: state.services.assistant.runtime_info(),
        runs_retained: state.services.registry.len(),
    })
}

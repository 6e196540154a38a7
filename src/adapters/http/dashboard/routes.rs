//! HTTP routes for dashboard endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    add_context, clear_history, get_run, get_stats, health, list_runs, list_tools, submit_frago,
    submit_query, DashboardAppState,
};

/// Creates the dashboard router with all routes.
pub fn dashboard_routes(state: DashboardAppState) -> Router {
    Router::new()
        .route("/api/query", post(submit_query))
        .route("/api/frago", post(submit_frago))
        .route("/api/history/clear", post(clear_history))
        .route("/api/history/context", post(add_context))
        .route("/api/runs", get(list_runs))
        .route("/api/runs/:run_id", get(get_run))
        .route("/api/stats", get(get_stats))
        .route("/api/tools", get(list_tools))
        .route("/health", get(health))
        .with_state(state)
}

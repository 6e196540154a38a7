//! Dashboard HTTP adapter module.
//!
//! REST endpoints for submitting queries and FRAGOs, managing history and
//! inspecting runs, statistics and the tool catalogue.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::ErrorResponse;
pub use handlers::{DashboardApiError, DashboardAppState};
pub use routes::dashboard_routes;

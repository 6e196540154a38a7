//! HTTP adapters - REST API and the application router.

pub mod dashboard;

use std::time::Duration;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::adapters::websocket::websocket_router;
use crate::config::ServerConfig;

pub use dashboard::{dashboard_routes, DashboardApiError, DashboardAppState, ErrorResponse};

/// Full application router: dashboard API, live feed and middleware.
pub fn app_router(state: DashboardAppState, server: &ServerConfig) -> Router {
    dashboard_routes(state.clone())
        .merge(websocket_router(state))
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs)))
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(TraceLayer::new_for_http())
}

/// CORS for the dashboard frontend; any origin when none are configured.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}

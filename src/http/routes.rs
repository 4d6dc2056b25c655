//! HTTP routing configuration for all endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::http::handlers::*;
use crate::http::state::AppState;

/// Build the Axum router with all endpoints.
///
/// Every path not taken by a configuration, stats or status endpoint, and
/// every other method on those paths, is answered by the configured stubs.
///
/// # Parameters
///
/// - `state` - Application state containing the stub registry
///
/// # Returns
///
/// Returns configured Axum `Router`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status).fallback(serve))
        // Stub configuration
        .route("/configure", post(configure_file).fallback(serve))
        .route("/configure_content", post(configure_content).fallback(serve))
        // Route statistics
        .route("/routes/{*rest}", get(route_stats).fallback(serve))
        // Stubbed requests
        .fallback(serve)
        .with_state(state)
}

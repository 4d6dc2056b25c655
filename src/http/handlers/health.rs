//! Health check and request logging.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::info;

/// Health check endpoint.
///
/// # Returns
///
/// Returns an empty 200 response.
pub async fn status() {}

/// Log every request with its status and latency.
///
/// # Parameters
///
/// - `request` - Incoming request
/// - `next` - Remaining middleware and handler
///
/// # Returns
///
/// Returns the handler's response unchanged.
pub async fn access_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        target: "http_stub::access",
        "{method} {uri} {} {:.3} ms",
        response.status().as_u16(),
        started.elapsed().as_secs_f64() * 1000.0
    );
    response
}

//! Route statistics endpoint.

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};

use crate::http::handlers::serve::serve;
use crate::http::state::AppState;
use crate::stats::{StatError, StatQuery, StatValue};

impl IntoResponse for StatError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::RouteNotConfigured { .. } => StatusCode::IM_A_TEAPOT,
            Self::StatNotFound { .. } => StatusCode::NOT_FOUND,
        };
        (status, self.to_string()).into_response()
    }
}

impl IntoResponse for StatValue {
    fn into_response(self) -> Response {
        match self {
            Self::Scalar(text) => text.into_response(),
            Self::Structured(value) => Json(value).into_response(),
        }
    }
}

/// Answer `GET /routes/<route>/methods/<method>/stats/<stat-path>`.
///
/// Targets under `/routes/` without the stat shape are dispatched like any
/// other stubbed request.
///
/// # Parameters
///
/// - `state` - Application state containing the stub registry
/// - `method` - Request method
/// - `uri` - Request target
/// - `body` - Request body, used only when falling through to stubs
///
/// # Returns
///
/// Returns the stat as text or JSON, 418 for an unknown route, 404 for an unknown stat.
pub async fn route_stats(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let target = uri.path_and_query().map_or_else(|| uri.path(), |pq| pq.as_str());
    let Some(query) = StatQuery::parse(target) else {
        return serve(State(state), method, uri, body).await;
    };

    match state.stubs.resolve_stat(&query) {
        Ok(value) => value.into_response(),
        Err(e) => e.into_response(),
    }
}

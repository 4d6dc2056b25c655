//! Catch-all handler answering stubbed requests.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use crate::dispatch::{Dispatch, UNCONFIGURED_MESSAGE};
use crate::http::state::AppState;
use crate::matchers::RequestKey;
use crate::proxy::{ProxiedFile, ProxyError};
use crate::stubs::ContentStub;

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_GATEWAY, self.to_string()).into_response()
    }
}

/// Answer any request that is not a configuration or stats call.
///
/// # Parameters
///
/// - `state` - Application state containing the dispatcher
/// - `method` - Request method
/// - `uri` - Request target; the query string takes part in matching
/// - `body` - Raw request body
///
/// # Returns
///
/// Returns the proxied file, the stubbed content, 418 when nothing matches,
/// or 502 when a file stub's source cannot be fetched.
pub async fn serve(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let target = uri.path_and_query().map_or_else(|| uri.path(), |pq| pq.as_str());
    let body = String::from_utf8_lossy(&body);
    let key = RequestKey::new(target, method.as_str());

    match state.dispatcher.dispatch(key, &body).await {
        Ok(Dispatch::File(file)) => file_response(file),
        Ok(Dispatch::Content(stub)) => content_response(&stub),
        Ok(Dispatch::Unconfigured) => {
            (StatusCode::IM_A_TEAPOT, UNCONFIGURED_MESSAGE).into_response()
        }
        Err(e) => {
            warn!("{e}");
            e.into_response()
        }
    }
}

fn file_response(file: ProxiedFile) -> Response {
    let mut response = Response::new(file.body);
    *response.status_mut() = file.status;
    if let Some(content_type) = file.content_type {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    response
}

fn content_response(stub: &ContentStub) -> Response {
    let rendered = stub.render();
    info!(
        path = %stub.path,
        content_type = rendered.content_type,
        "returning content: {}",
        rendered.body
    );
    (stub.status(), [(header::CONTENT_TYPE, rendered.content_type)], Body::from(rendered.body))
        .into_response()
}

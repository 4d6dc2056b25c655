//! Stub configuration endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::http::state::AppState;
use crate::stubs::{ConfigureError, ContentStub, ContentStubSpec, FileStub, FileStubSpec};

/// Body sent when a stub was registered.
const CONFIGURED: &str = "Configured";

impl IntoResponse for ConfigureError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

/// Register a file-backed stub.
///
/// Deprecated in favour of `/configure_content`.
///
/// # Parameters
///
/// - `state` - Application state containing the stub registry
/// - `body` - JSON body with `path`, `file` and optional `code`, `method`, `skipQueryParams`
///
/// # Returns
///
/// Returns 201 when registered, or 400 if the configuration is invalid.
pub async fn configure_file(State(state): State<AppState>, body: Bytes) -> Response {
    warn!("/configure is deprecated for file stubs, use /configure_content instead");

    match parse::<FileStubSpec>(&body).and_then(FileStub::try_from) {
        Ok(stub) => {
            state.stubs.add_file_stub(stub);
            (StatusCode::CREATED, CONFIGURED).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Register a content stub.
///
/// # Parameters
///
/// - `state` - Application state containing the stub registry
/// - `body` - JSON body with `path`, `content` and optional `type`, `code`, `body`,
///   `bodyType`, `method`, `skipQueryParams`
///
/// # Returns
///
/// Returns 201 when registered, or 400 if the configuration is invalid.
pub async fn configure_content(State(state): State<AppState>, body: Bytes) -> Response {
    match parse::<ContentStubSpec>(&body).and_then(ContentStub::try_from) {
        Ok(stub) => {
            state.stubs.add_content_stub(stub);
            (StatusCode::CREATED, CONFIGURED).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Parse a configuration body. An empty body counts as an empty object.
fn parse<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ConfigureError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ConfigureError::InvalidJson(e.to_string()))
}

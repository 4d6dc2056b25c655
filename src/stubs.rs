//! Stub definitions and their configuration payloads.
//!
//! [`FileStubSpec`] and [`ContentStubSpec`] mirror the JSON accepted by the
//! configuration endpoints (and the entries of a stub file). Converting a spec
//! validates it and yields the stored [`FileStub`] or [`ContentStub`].

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::body::{BodyKind, ExpectedBody};
use crate::matchers::Routable;

/// Method used when a configuration omits it.
pub const DEFAULT_METHOD: &str = "GET";

/// Errors raised when a configuration call is invalid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigureError {
    #[error("Configure must be called with path and file parameters")]
    MissingFileFields,
    #[error("Configure must be called with path and content parameters")]
    MissingContentFields,
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),
    #[error("invalid status code: {0}")]
    InvalidStatus(u16),
}

/// A stub answered by proxying a remote file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStub {
    pub path: String,
    pub method: String,
    pub source_url: String,
    pub override_status: Option<StatusCode>,
    pub skip_query_params: bool,
}

/// Serialization of a content stub's payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    #[default]
    Raw,
}

/// A stub answered with an inline payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentStub {
    pub path: String,
    pub method: String,
    pub skip_query_params: bool,
    pub payload: Value,
    pub kind: ContentKind,
    pub override_status: Option<StatusCode>,
    pub expected_body: Option<ExpectedBody>,
}

/// Rendered response body of a content stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContent {
    pub content_type: &'static str,
    pub body: String,
}

impl ContentStub {
    const JSON_CONTENT_TYPE: &'static str = "application/json";
    const TEXT_CONTENT_TYPE: &'static str = "text/html; charset=utf-8";

    /// Status code the stub answers with.
    pub fn status(&self) -> StatusCode {
        self.override_status.unwrap_or(StatusCode::OK)
    }

    /// Render the payload for the response.
    ///
    /// String payloads are sent verbatim; anything else is serialized as JSON.
    ///
    /// # Returns
    ///
    /// Returns the content type and the body text.
    pub fn render(&self) -> RenderedContent {
        match &self.payload {
            Value::String(text) => RenderedContent {
                content_type: match self.kind {
                    ContentKind::Json => Self::JSON_CONTENT_TYPE,
                    ContentKind::Raw => Self::TEXT_CONTENT_TYPE,
                },
                body: text.clone(),
            },
            other => RenderedContent {
                content_type: Self::JSON_CONTENT_TYPE,
                body: other.to_string(),
            },
        }
    }
}

impl Routable for FileStub {
    fn path(&self) -> &str {
        &self.path
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn skip_query_params(&self) -> bool {
        self.skip_query_params
    }
}

impl Routable for ContentStub {
    fn path(&self) -> &str {
        &self.path
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn skip_query_params(&self) -> bool {
        self.skip_query_params
    }
}

/// Body of `POST /configure`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStubSpec {
    pub path: Option<String>,
    pub file: Option<String>,
    pub code: Option<u16>,
    pub method: Option<String>,
    pub skip_query_params: Option<bool>,
}

/// Body of `POST /configure_content`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStubSpec {
    pub path: Option<String>,
    #[serde(default)]
    pub content: Value,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub code: Option<u16>,
    #[serde(default)]
    pub body: Value,
    pub body_type: Option<String>,
    pub method: Option<String>,
    pub skip_query_params: Option<bool>,
}

impl TryFrom<FileStubSpec> for FileStub {
    type Error = ConfigureError;

    fn try_from(spec: FileStubSpec) -> Result<Self, Self::Error> {
        let (Some(path), Some(source_url)) = (non_empty(spec.path), non_empty(spec.file)) else {
            return Err(ConfigureError::MissingFileFields);
        };

        Ok(Self {
            path,
            method: normalize_method(spec.method),
            source_url,
            override_status: status_code(spec.code)?,
            skip_query_params: spec.skip_query_params.unwrap_or(false),
        })
    }
}

impl TryFrom<ContentStubSpec> for ContentStub {
    type Error = ConfigureError;

    fn try_from(spec: ContentStubSpec) -> Result<Self, Self::Error> {
        let Some(path) = non_empty(spec.path) else {
            return Err(ConfigureError::MissingContentFields);
        };
        if is_blank(&spec.content) {
            return Err(ConfigureError::MissingContentFields);
        }

        let kind = match spec.content_type.as_deref() {
            Some("json") => ContentKind::Json,
            _ => ContentKind::Raw,
        };

        Ok(Self {
            path,
            method: normalize_method(spec.method),
            skip_query_params: spec.skip_query_params.unwrap_or(false),
            payload: spec.content,
            kind,
            override_status: status_code(spec.code)?,
            expected_body: expected_body(spec.body, spec.body_type.as_deref()),
        })
    }
}

/// Build the expected body of a content stub.
///
/// JSON bodies are stored in serialized form and compared as text.
fn expected_body(body: Value, body_type: Option<&str>) -> Option<ExpectedBody> {
    let value = match (body_type, body) {
        (_, Value::Null) => return None,
        (Some("json"), body) => body.to_string(),
        (_, Value::String(text)) => text,
        (_, other) => other.to_string(),
    };
    if value.is_empty() {
        return None;
    }

    let kind = if body_type == Some("xml") { BodyKind::Xml } else { BodyKind::Text };
    Some(ExpectedBody::new(kind, value))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Values that count as "no content": null, false, zero and the empty string.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn normalize_method(method: Option<String>) -> String {
    non_empty(method).map_or_else(|| DEFAULT_METHOD.to_string(), |m| m.to_uppercase())
}

fn status_code(code: Option<u16>) -> Result<Option<StatusCode>, ConfigureError> {
    code.map(|code| StatusCode::from_u16(code).map_err(|_| ConfigureError::InvalidStatus(code)))
        .transpose()
}

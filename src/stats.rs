//! Per-route call statistics and the stat path query language.
//!
//! A [`RouteStats`] record exists for every `(path, method)` pair that has at
//! least one content stub. Its queryable view has the shape
//!
//! ```json
//! {"count": 2, "requests": {"1": {"requestBody": "a"}, "2": {"requestBody": "b"}, "last": {"requestBody": "b"}}}
//! ```
//!
//! and is walked segment by segment by [`resolve`].

use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::matchers::Routable;

/// A single observed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedRequest {
    #[serde(rename = "requestBody")]
    pub request_body: String,
}

/// Call history for one path and method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStats {
    pub path: String,
    pub method: String,
    pub skip_query_params: bool,
    requests: Vec<RecordedRequest>,
}

impl RouteStats {
    /// Create an empty statistics record.
    ///
    /// # Parameters
    ///
    /// - `path` - Stubbed path
    /// - `method` - Stubbed method
    /// - `skip_query_params` - Query string handling, copied from the first stub of the route
    ///
    /// # Returns
    ///
    /// Returns a new `RouteStats` with a zero call count.
    pub fn new(path: impl Into<String>, method: impl Into<String>, skip_query_params: bool) -> Self {
        Self { path: path.into(), method: method.into(), skip_query_params, requests: Vec::new() }
    }

    /// Number of recorded calls.
    pub fn count(&self) -> usize {
        self.requests.len()
    }

    /// Get a recorded request by its 1-based index.
    pub fn request(&self, index: usize) -> Option<&RecordedRequest> {
        index.checked_sub(1).and_then(|i| self.requests.get(i))
    }

    /// Most recently recorded request.
    pub fn last(&self) -> Option<&RecordedRequest> {
        self.requests.last()
    }

    /// Record one call with its request body.
    pub fn record(&mut self, body: impl Into<String>) {
        self.requests.push(RecordedRequest { request_body: body.into() });
    }

    /// Queryable view of the statistics.
    pub fn to_value(&self) -> Value {
        let mut requests = Map::new();
        for (i, request) in self.requests.iter().enumerate() {
            requests.insert((i + 1).to_string(), json!(request));
        }
        if let Some(last) = self.last() {
            requests.insert("last".to_string(), json!(last));
        }
        json!({ "count": self.count(), "requests": requests })
    }

}

impl Routable for RouteStats {
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

/// Errors raised while resolving a stat query.
#[derive(Debug, Error, PartialEq)]
pub enum StatError {
    /// No content stub was ever configured for the route and method.
    #[error("Route {route} not configured for method {method}")]
    RouteNotConfigured { route: String, method: String },
    /// A stat path segment does not exist; `service` is the value reached before it.
    #[error("No stat {stat} for service: {service}")]
    StatNotFound { stat: String, service: Value },
}

/// A parsed `/routes/<route>/methods/<method>/stats/<stat-path>` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatQuery {
    /// Stubbed path, may contain slashes and a query string.
    pub route: String,
    /// Upper-cased method.
    pub method: String,
    /// Stat keys to walk, in order.
    pub stat: Vec<String>,
}

impl StatQuery {
    const ROUTES_PREFIX: &'static str = "/routes";
    const METHODS_SEPARATOR: &'static str = "/methods/";
    const STATS_SEPARATOR: &'static str = "/stats/";

    /// Parse a stat request target.
    ///
    /// The route ends at the first `/methods/<method>/stats/` whose method
    /// segment has no slash, so routes may themselves contain `/methods/`.
    /// The remainder is split on `/` into stat keys.
    ///
    /// # Parameters
    ///
    /// - `target` - Raw request path and query
    ///
    /// # Returns
    ///
    /// Returns `Some(StatQuery)` if the target has the stat route shape, `None` otherwise.
    pub fn parse(target: &str) -> Option<Self> {
        let rest = target.strip_prefix(Self::ROUTES_PREFIX)?;

        rest.match_indices(Self::METHODS_SEPARATOR).find_map(|(at, separator)| {
            let route = &rest[..at];
            let after = &rest[at + separator.len()..];
            let (method, stat) = after.split_once(Self::STATS_SEPARATOR)?;
            if method.contains('/') {
                return None;
            }

            Some(Self {
                route: route.to_string(),
                method: method.to_uppercase(),
                stat: stat.split('/').map(str::to_string).collect(),
            })
        })
    }
}

/// Result of a resolved stat query.
#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    /// A leaf value rendered as text.
    Scalar(String),
    /// A nested structure to be serialized.
    Structured(Value),
}

/// Walk the statistics of a route along the given stat keys.
///
/// # Parameters
///
/// - `stats` - Statistics record of the route
/// - `stat` - Stat keys, e.g. `["requests", "last"]` or `["count"]`
///
/// # Returns
///
/// Returns the addressed value.
///
/// # Errors
///
/// Returns `StatError::StatNotFound` with the first missing key and the
/// structure it was looked up in.
pub fn resolve(stats: &RouteStats, stat: &[String]) -> Result<StatValue, StatError> {
    let root = stats.to_value();
    let mut current = &root;

    for key in stat {
        current = current.as_object().and_then(|object| object.get(key)).ok_or_else(|| {
            StatError::StatNotFound { stat: key.clone(), service: current.clone() }
        })?;
    }

    Ok(match current {
        Value::String(text) => StatValue::Scalar(text.clone()),
        Value::Number(number) => StatValue::Scalar(number.to_string()),
        Value::Bool(flag) => StatValue::Scalar(flag.to_string()),
        structured => StatValue::Structured(structured.clone()),
    })
}

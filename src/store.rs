//! In-memory stub registry shared by all request handlers.
//!
//! File stubs, content stubs and route statistics live behind a single lock,
//! so a content lookup (match, rotate, validate, record) is applied atomically
//! with respect to every other registration or lookup.

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::body;
use crate::matchers::{find_all, find_exact, find_last, RequestKey};
use crate::rotation::next_in_rotation;
use crate::stats::{self, RouteStats, StatError, StatQuery, StatValue};
use crate::stubs::{ContentStub, FileStub};

#[derive(Debug, Default)]
struct Registry {
    files: Vec<FileStub>,
    contents: Vec<ContentStub>,
    stats: Vec<RouteStats>,
}

/// Outcome of looking up a content stub for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentLookup {
    /// No content stub is configured for the path and method.
    NotFound,
    /// The selected stub expects a different request body.
    BodyMismatch,
    /// The selected stub answers the request; the call was recorded.
    Served(ContentStub),
}

/// Registry of configured stubs and their statistics.
#[derive(Debug, Default)]
pub struct StubStore {
    registry: Mutex<Registry>,
}

impl StubStore {
    /// Create a new empty store.
    ///
    /// # Returns
    ///
    /// Returns a new `StubStore` without stubs or statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file-backed stub.
    pub fn add_file_stub(&self, stub: FileStub) {
        info!(
            path = %stub.path,
            method = %stub.method,
            file = %stub.source_url,
            code = ?stub.override_status.map(|s| s.as_u16()),
            skip_query_params = stub.skip_query_params,
            "configured file stub"
        );
        self.registry.lock().files.push(stub);
    }

    /// Register a content stub, creating the route statistics on first use.
    ///
    /// # Parameters
    ///
    /// - `stub` - Validated content stub
    pub fn add_content_stub(&self, stub: ContentStub) {
        info!(
            path = %stub.path,
            method = %stub.method,
            kind = ?stub.kind,
            code = ?stub.override_status.map(|s| s.as_u16()),
            content = %stub.payload,
            skip_query_params = stub.skip_query_params,
            "configured content stub"
        );

        let mut registry = self.registry.lock();
        if find_exact(&registry.stats, &stub.path, &stub.method).is_none() {
            let stats = RouteStats::new(&stub.path, &stub.method, stub.skip_query_params);
            registry.stats.push(stats);
        }
        registry.contents.push(stub);
    }

    /// Find the file stub answering a request.
    ///
    /// # Parameters
    ///
    /// - `key` - Request path and method
    ///
    /// # Returns
    ///
    /// Returns a copy of the most recently configured matching file stub.
    pub fn find_file_stub(&self, key: &RequestKey<'_>) -> Option<FileStub> {
        let registry = self.registry.lock();
        find_last(&registry.files, key).map(|position| registry.files[position].clone())
    }

    /// Select the content stub answering a request and record the call.
    ///
    /// When several content stubs match, the earliest one is served and the
    /// matches are rotated so that the next request gets the following one.
    /// The rotation happens before body validation, so a rejected request
    /// still advances the rotation.
    ///
    /// # Parameters
    ///
    /// - `key` - Request path and method
    /// - `body` - Raw request body
    ///
    /// # Returns
    ///
    /// Returns the lookup outcome.
    pub fn serve_content(&self, key: &RequestKey<'_>, body: &str) -> ContentLookup {
        let mut registry = self.registry.lock();

        let positions = find_all(&registry.contents, key);
        debug!(path = key.path, method = key.method, matches = positions.len(), "content lookup");
        let Some(stub) = next_in_rotation(&mut registry.contents, &positions) else {
            return ContentLookup::NotFound;
        };

        if !body::validate(stub.expected_body.as_ref(), body) {
            return ContentLookup::BodyMismatch;
        }

        // The statistics of the route may use a different query string policy
        // than the served stub; fall back to the record created for its own route.
        let position = find_last(&registry.stats, key)
            .or_else(|| find_exact(&registry.stats, &stub.path, &stub.method));
        match position {
            Some(position) => registry.stats[position].record(body),
            None => {
                let mut stats = RouteStats::new(&stub.path, &stub.method, stub.skip_query_params);
                stats.record(body);
                registry.stats.push(stats);
            }
        }

        ContentLookup::Served(stub)
    }

    /// Resolve a stat query against the recorded statistics.
    ///
    /// # Parameters
    ///
    /// - `query` - Parsed stat query
    ///
    /// # Returns
    ///
    /// Returns the addressed statistic.
    ///
    /// # Errors
    ///
    /// Returns `StatError::RouteNotConfigured` if the route has no statistics,
    /// or `StatError::StatNotFound` if a stat key is missing.
    pub fn resolve_stat(&self, query: &StatQuery) -> Result<StatValue, StatError> {
        let registry = self.registry.lock();
        let position = find_exact(&registry.stats, &query.route, &query.method).ok_or_else(|| {
            StatError::RouteNotConfigured {
                route: query.route.clone(),
                method: query.method.clone(),
            }
        })?;
        stats::resolve(&registry.stats[position], &query.stat)
    }

    /// Snapshot of the statistics of a route.
    pub fn route_stats(&self, path: &str, method: &str) -> Option<RouteStats> {
        let registry = self.registry.lock();
        find_exact(&registry.stats, path, method).map(|position| registry.stats[position].clone())
    }

    /// Number of registered file stubs.
    pub fn file_stub_count(&self) -> usize {
        self.registry.lock().files.len()
    }

    /// Number of registered content stubs.
    pub fn content_stub_count(&self) -> usize {
        self.registry.lock().contents.len()
    }

    /// Number of route statistics records.
    pub fn route_stats_count(&self) -> usize {
        self.registry.lock().stats.len()
    }
}

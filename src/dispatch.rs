//! Request dispatching for every non-configuration request.
//!
//! File stubs take precedence: once one matches, its proxy result is final,
//! even on failure. Otherwise the content stubs are consulted, and anything
//! left over is reported as unconfigured.

use std::sync::Arc;

use tracing::debug;

use crate::matchers::RequestKey;
use crate::proxy::{FileProxy, ProxiedFile, ProxyError};
use crate::store::{ContentLookup, StubStore};
use crate::stubs::ContentStub;

/// Message sent with every unconfigured response.
pub const UNCONFIGURED_MESSAGE: &str = "The requested service does not exist";

/// Final decision for a request.
#[derive(Debug)]
pub enum Dispatch {
    /// A file stub matched and its source was fetched.
    File(ProxiedFile),
    /// A content stub matched and its body expectation was met.
    Content(ContentStub),
    /// Nothing answers the request.
    Unconfigured,
}

/// Orchestrates file proxying and content lookup.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    store: Arc<StubStore>,
    proxy: FileProxy,
}

impl Dispatcher {
    /// Create a new dispatcher.
    ///
    /// # Parameters
    ///
    /// - `store` - Stub registry
    /// - `proxy` - Client used for file stubs
    ///
    /// # Returns
    ///
    /// Returns a new `Dispatcher` instance.
    pub fn new(store: Arc<StubStore>, proxy: FileProxy) -> Self {
        Self { store, proxy }
    }

    /// Decide how to answer a request.
    ///
    /// # Parameters
    ///
    /// - `key` - Request path (with query string) and method
    /// - `body` - Raw request body
    ///
    /// # Returns
    ///
    /// Returns the dispatch decision.
    ///
    /// # Errors
    ///
    /// Returns `ProxyError` if a file stub matched but its source could not be fetched.
    pub async fn dispatch(&self, key: RequestKey<'_>, body: &str) -> Result<Dispatch, ProxyError> {
        if let Some(stub) = self.store.find_file_stub(&key) {
            debug!(path = key.path, method = key.method, url = %stub.source_url, "file stub matched");
            return self.proxy.fetch(&stub).await.map(Dispatch::File);
        }

        Ok(match self.store.serve_content(&key, body) {
            ContentLookup::Served(stub) => Dispatch::Content(stub),
            ContentLookup::NotFound | ContentLookup::BodyMismatch => Dispatch::Unconfigured,
        })
    }
}

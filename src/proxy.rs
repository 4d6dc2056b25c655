//! Remote file proxying for file-backed stubs.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::stubs::FileStub;

/// Errors raised while proxying a remote file.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The HTTP client could not be created.
    #[error("http client: {0}")]
    Client(#[source] reqwest::Error),
    /// The remote file could not be fetched.
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A remote response ready to be streamed back to the caller.
#[derive(Debug)]
pub struct ProxiedFile {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Body,
}

/// HTTP client fetching the sources of file stubs.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct FileProxy {
    client: reqwest::Client,
}

impl FileProxy {
    /// Outbound timeout used when none is configured.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a new proxy.
    ///
    /// # Parameters
    ///
    /// - `timeout` - Upper bound for a whole remote fetch, body included
    ///
    /// # Returns
    ///
    /// Returns a new `FileProxy`, or `ProxyError::Client` if the client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(ProxyError::Client)?;
        Ok(Self { client })
    }

    /// Fetch the source of a file stub.
    ///
    /// The body is streamed, not buffered. Dropping the returned body aborts
    /// the remote transfer.
    ///
    /// # Parameters
    ///
    /// - `stub` - File stub to answer
    ///
    /// # Returns
    ///
    /// Returns the stub's status override (or the remote status) with the remote body.
    ///
    /// # Errors
    ///
    /// Returns `ProxyError::Fetch` if the remote request fails.
    pub async fn fetch(&self, stub: &FileStub) -> Result<ProxiedFile, ProxyError> {
        debug!(url = %stub.source_url, "fetching remote file");
        let response = self
            .client
            .get(&stub.source_url)
            .send()
            .await
            .map_err(|source| ProxyError::Fetch { url: stub.source_url.clone(), source })?;

        let status = stub.override_status.unwrap_or_else(|| response.status());
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();

        Ok(ProxiedFile { status, content_type, body: Body::from_stream(response.bytes_stream()) })
    }
}

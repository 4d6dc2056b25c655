//! Application state and configuration for the HTTP server.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::dispatch::Dispatcher;
use crate::proxy::FileProxy;
use crate::store::StubStore;

/// Application state shared across all HTTP handlers.
///
/// Each state owns its own registry, so independent servers never share stubs.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registry of configured stubs and statistics
    pub stubs: Arc<StubStore>,
    /// Dispatcher answering stubbed requests
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Create new application state.
    ///
    /// # Parameters
    ///
    /// - `stubs` - Stub registry
    /// - `proxy` - Client used to fetch file stub sources
    ///
    /// # Returns
    ///
    /// Returns configured `AppState` instance.
    pub fn new(stubs: Arc<StubStore>, proxy: FileProxy) -> Self {
        let dispatcher = Dispatcher::new(stubs.clone(), proxy);
        Self { stubs, dispatcher }
    }

    /// Get a builder for configuring application state step by step.
    ///
    /// # Returns
    ///
    /// Returns an `AppStateBuilder` for fluent configuration.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }
}

/// Builder for constructing AppState with fluent interface.
#[derive(Debug, Default)]
pub struct AppStateBuilder {
    stubs: Option<Arc<StubStore>>,
    proxy_timeout: Option<Duration>,
}

impl AppStateBuilder {
    /// Create a new builder with default values.
    ///
    /// # Returns
    ///
    /// Returns a new `AppStateBuilder` instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing stub registry, e.g. one preloaded from a stub file.
    ///
    /// # Parameters
    ///
    /// - `stubs` - Registry to serve from
    ///
    /// # Returns
    ///
    /// Returns the builder for method chaining.
    pub fn with_stubs(mut self, stubs: Arc<StubStore>) -> Self {
        self.stubs = Some(stubs);
        self
    }

    /// Set the outbound timeout for file stubs.
    ///
    /// # Parameters
    ///
    /// - `timeout` - Upper bound for fetching a remote file
    ///
    /// # Returns
    ///
    /// Returns the builder for method chaining.
    pub fn with_proxy_timeout(mut self, timeout: Duration) -> Self {
        self.proxy_timeout = Some(timeout);
        self
    }

    /// Build the final AppState with validation.
    ///
    /// # Returns
    ///
    /// Returns `Ok(AppState)` if valid, or an `io::Error` describing the problem.
    ///
    /// # Errors
    ///
    /// Returns error if the proxy timeout is zero or the HTTP client cannot be created.
    pub fn build(self) -> io::Result<AppState> {
        let timeout = self.proxy_timeout.unwrap_or(FileProxy::DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Proxy timeout must be greater than zero",
            ));
        }

        let proxy = FileProxy::new(timeout).map_err(io::Error::other)?;
        let stubs = self.stubs.unwrap_or_default();

        Ok(AppState::new(stubs, proxy))
    }
}

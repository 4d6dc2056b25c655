//! # HTTP Stub Library
//!
//! A library for running programmable HTTP stub servers in integration tests.
//!
//! Callers configure, at runtime, how the server answers given paths and
//! methods; every other client then gets those canned answers.
//!
//! This library provides components for:
//! - **Stub Registry**: File-backed and content stubs with per-route call statistics
//! - **Route Matching**: Path, method and query-string sensitive lookups
//! - **Round-Robin Rotation**: Several content stubs on one route are served in turn
//! - **Body Validation**: Optional plain text or structural XML request body checks
//! - **Stat Queries**: `/routes/<route>/methods/<method>/stats/<stat-path>` lookups
//! - **File Proxying**: Streaming remote files for file-backed stubs
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use http_stub_rs::{StubStore, http::build_router};
//!
//! # async fn example() -> std::io::Result<()> {
//! // Create the registry, optionally preloaded from a stub file
//! let stubs = Arc::new(StubStore::new());
//!
//! // Build HTTP router with state
//! let state = http_stub_rs::http::AppState::builder()
//!     .with_stubs(stubs)
//!     .build()?;
//! let app = build_router(state);
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod dispatch;
pub mod http;
pub mod matchers;
pub mod proxy;
pub mod rotation;
pub mod stats;
pub mod store;
pub mod stubfile;
pub mod stubs;

// Re-export commonly used types for convenience
pub use dispatch::{Dispatch, Dispatcher};
pub use matchers::{RequestKey, Routable};
pub use proxy::FileProxy;
pub use stats::{RouteStats, StatQuery, StatValue};
pub use store::{ContentLookup, StubStore};
pub use stubfile::StubFile;
pub use stubs::{ContentStub, FileStub};

//! # HTTP Stub Server CLI
//!
//! Command-line interface for the HTTP stub server.
//!
//! This binary runs the stub server, optionally preloading stubs from a YAML
//! file, and logs every request unless told to be quiet.

use std::io;
use std::sync::Arc;

use axum::middleware;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use http_stub_rs::http::handlers::access_log;
use http_stub_rs::http::{build_router, AppState};
use http_stub_rs::{StubFile, StubStore};

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> io::Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env_filter).init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Preload stubs (can work without file - empty registry)
    let stubs = Arc::new(StubStore::new());
    if let Some(path) = &cli.stubs {
        let count = StubFile::load_from_path(path)
            .and_then(|file| file.register(&stubs))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        tracing::info!("registered {count} stubs from {}", path.display());
    }

    let state =
        AppState::builder().with_stubs(stubs).with_proxy_timeout(cli.proxy_timeout).build()?;

    let mut app = build_router(state);
    if !cli.quiet {
        app = app.layer(middleware::from_fn(access_log));
    }

    let addr = cli.listen_addr();
    tracing::info!("starting http-stub on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}

//! Command-line interface definitions for the HTTP stub server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Command-line arguments for the HTTP stub server.
#[derive(Debug, Parser)]
#[command(name = "http-stub")]
#[command(author, version, about = "Programmable HTTP stub server for integration tests")]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "HTTP_STUB_LISTEN", default_value = "127.0.0.1:3000")]
    pub listen: SocketAddr,

    /// Port to listen on, overriding the port of --listen
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Path to a YAML file with stubs to register at startup
    #[arg(long)]
    pub stubs: Option<PathBuf>,

    /// Timeout for fetching the remote file of a file stub (e.g. 500ms, 30s)
    #[arg(long, value_parser = humantime::parse_duration, default_value = "30s")]
    pub proxy_timeout: Duration,

    /// Do not log every request
    #[arg(long)]
    pub quiet: bool,
}

impl Cli {
    /// Address to bind, with the port override applied.
    pub fn listen_addr(&self) -> SocketAddr {
        let mut addr = self.listen;
        if let Some(port) = self.port {
            addr.set_port(port);
        }
        addr
    }
}

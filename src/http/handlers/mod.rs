//! HTTP handlers for configuration, statistics and stubbed requests.

pub mod configure;
pub mod health;
pub mod serve;
pub mod stats;

// Re-export handlers for easier access
pub use configure::{configure_content, configure_file};
pub use health::{access_log, status};
pub use serve::serve;
pub use stats::route_stats;

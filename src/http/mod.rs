//! HTTP server exposing stub configuration, statistics and the stubbed routes.

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;

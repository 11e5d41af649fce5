#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod ai;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
pub mod ws;


pub use config::server::ServerConfig;
pub use error::AppError;
pub use middleware::cors::cors_middleware;
pub use middleware::structured_logger::StructuredLogger;
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}

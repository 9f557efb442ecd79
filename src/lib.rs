pub mod config;
pub mod display;
pub mod domain;
pub mod error;
pub mod events;
pub mod manifest;
pub mod service;
pub mod store;
pub mod ui;

pub use error::{ProjectVersionError, Result};

use tracing_subscriber::EnvFilter;

/// Install a stderr tracing subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Subsequent calls are no-ops.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

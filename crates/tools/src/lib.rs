//! miniPIC Tools
//!
//! CLI front end for validating miniPIC simulation output.

pub mod commands;
pub mod inspect;

use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging with a default filter.
///
/// Use `RUST_LOG` environment variable to override the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,minipic_validation=info,minipic_tools=debug")
    });

    fmt().with_env_filter(filter).with_target(false).init();
}

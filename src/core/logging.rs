//! Logging Initialization
//!
//! Library code logs through the `log` facade. The binary installs a
//! `tracing` subscriber writing to stderr and bridges `log` records into it,
//! so stdout stays free for record output.

use std::io;

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log filter '{directive}': {message}")]
    Filter { directive: String, message: String },

    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

/// Filter from `RUST_LOG`, falling back to `default_level`.
pub fn build_filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(default_level).map_err(|e| LoggingError::Filter {
        directive: default_level.to_string(),
        message: e.to_string(),
    })
}

/// Initialize the logging system.
///
/// Sets up a human-readable stderr layer and redirects `log` macros to
/// `tracing`. Calling this twice leaves the first subscriber in place; the
/// second call returns an error.
pub fn init(default_level: &str) -> Result<(), LoggingError> {
    let env_filter = build_filter(default_level)?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_filter(env_filter);

    let subscriber = tracing_subscriber::registry().with(stderr_layer);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LoggingError::Subscriber(e.to_string()))?;

    // Redirect standard `log` macros to `tracing`
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {}", e);
    }

    log::debug!("Logging initialized at '{}'", default_level);
    Ok(())
}

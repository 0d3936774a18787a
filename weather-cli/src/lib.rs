//! Shared pieces of the `weather-card` and `update-location` binaries.
//!
//! This crate focuses on:
//! - The interactive location update flow
//! - Polling the widget server and drawing the card
//! - Console-friendly logging setup

pub mod card;
pub mod update;

use tracing_subscriber::EnvFilter;

/// Log to stderr, `warn` and above unless `RUST_LOG` says otherwise, so the
/// tools' own output on stdout stays readable.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

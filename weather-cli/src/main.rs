//! Binary crate for the `weather-card` terminal widget.
//!
//! This binary focuses on:
//! - Parsing CLI arguments
//! - Polling the widget server
//! - Drawing the weather card

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    weather_widget_cli::init_logging();
    let cmd = cli::Cli::parse();
    cmd.run().await
}

use clap::Parser;
use weather_widget_cli::card::{self, WeatherFeed};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-card", version, about = "Terminal weather card for the widget server")]
pub struct Cli {
    /// Base URL of the widget server.
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    pub server: String,

    /// Draw the card once and exit instead of polling.
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        card::run(WeatherFeed::new(&self.server), self.once).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_server_and_polling() {
        let cli = Cli::parse_from(["weather-card"]);

        assert_eq!(cli.server, "http://127.0.0.1:3000");
        assert!(!cli.once);
    }

    #[test]
    fn accepts_server_and_once() {
        let cli = Cli::parse_from(["weather-card", "--server", "http://pi.local:8080", "--once"]);

        assert_eq!(cli.server, "http://pi.local:8080");
        assert!(cli.once);
    }
}

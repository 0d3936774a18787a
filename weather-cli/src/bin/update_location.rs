//! `update-location`: ask for a place name, geocode it and store it as the
//! widget's current location.

use anyhow::Result;
use inquire::{InquireError, Text};
use weather_widget_cli::update::{self, Outcome};
use weather_widget_core::{Config, LocationStore, NominatimClient};

#[tokio::main]
async fn main() -> Result<()> {
    weather_widget_cli::init_logging();

    let cfg = Config::load()?;
    let store = LocationStore::new(cfg.store_path.clone());
    let geocoder = NominatimClient::from_config(&cfg.nominatim);
    let mut stdout = std::io::stdout();

    println!("=== Update Your Location ===");
    update::describe_current(&store, &mut stdout)?;
    println!();

    let input = match Text::new("Enter your new location (e.g., \"New York, NY\" or \"Paris, France\"):")
        .prompt()
    {
        Ok(text) => text,
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => String::new(),
        Err(e) => return Err(e.into()),
    };

    let outcome = update::update_location(&store, &geocoder, &input, &mut stdout).await?;
    if !matches!(outcome, Outcome::Updated(_)) {
        tracing::debug!(?outcome, "location left unchanged");
    }
    Ok(())
}

use std::io::Write;

use anyhow::{Context, Result};
use weather_widget_core::{LocationRecord, LocationStore, NominatimClient, StoreError};

/// How an update attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Updated(LocationRecord),
    /// Blank input; nothing was looked up or written.
    NoInput,
    /// The geocoder answered but had no match.
    NotFound,
    /// The geocoder couldn't be reached or answered with an error.
    LookupFailed,
    /// The top match lacks a field the store requires.
    Unusable(&'static str),
}

/// Print the stored location, or a notice when there is none.
pub fn describe_current(store: &LocationStore, out: &mut impl Write) -> Result<()> {
    match store.get() {
        Ok(record) => writeln!(out, "Current location: {}", record.label())?,
        Err(StoreError::Missing { .. }) => {
            writeln!(out, "No current location found.")?;
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not read current location");
            writeln!(out, "No current location found or error reading file.")?;
        }
    }
    Ok(())
}

/// Geocode `place` and, if it resolves, overwrite the stored location.
///
/// Lookup failures are reported on `out` and leave the store untouched; only
/// console and storage errors are returned as `Err`.
pub async fn update_location(
    store: &LocationStore,
    geocoder: &NominatimClient,
    place: &str,
    out: &mut impl Write,
) -> Result<Outcome> {
    let place = place.trim();
    if place.is_empty() {
        writeln!(out, "No location entered. Exiting...")?;
        return Ok(Outcome::NoInput);
    }

    writeln!(out, "Fetching coordinates for {place} ...")?;

    let found = match geocoder.resolve(place).await {
        Ok(Some(found)) => found,
        Ok(None) => {
            writeln!(
                out,
                "No results found for \"{place}\". Please try again with a different location name."
            )?;
            return Ok(Outcome::NotFound);
        }
        Err(e) => {
            tracing::error!(error = %e, "geocoding request failed");
            writeln!(
                out,
                "Failed to get coordinates: the lookup service is unavailable. Please try again later."
            )?;
            return Ok(Outcome::LookupFailed);
        }
    };

    let record = match store.set(found.into()) {
        Ok(record) => record,
        Err(StoreError::Validation(field)) => {
            tracing::warn!(place, field, "geocoded match is missing a required field");
            writeln!(
                out,
                "The match for \"{place}\" has no usable {field}. Please try again with a different location name."
            )?;
            return Ok(Outcome::Unusable(field));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to write {}", store.path().display()));
        }
    };

    writeln!(out, "\nLocation updated successfully!")?;
    writeln!(out, "New location: {}", record.label())?;
    writeln!(out, "Coordinates: {}", record.coordinates())?;
    writeln!(out, "\nYour weather widget will update with the new location.")?;

    Ok(Outcome::Updated(record))
}

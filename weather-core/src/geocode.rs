//! Forward geocoding: free-text place name to coordinates.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use reqwest::{Client, header};
use serde::Deserialize;

use crate::{
    config::NominatimConfig,
    error::{UpstreamError, truncate_body},
    model::LocationInput,
};

const PROVIDER: &str = "Nominatim";

/// Top match for a place name.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    pub city: String,
    pub state: Option<String>,
    /// Uppercase country code, empty when the provider gave none.
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<GeocodeMatch> for LocationInput {
    fn from(m: GeocodeMatch) -> Self {
        let mut input = LocationInput::new(m.city, m.latitude, m.longitude).with_country(m.country);
        input.state = m.state;
        input
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    state: Option<String>,
    country_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    base_url: String,
    user_agent: String,
    http: Client,
}

impl NominatimClient {
    pub fn new(base_url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &NominatimConfig) -> Self {
        Self::new(config.base_url.as_str(), config.user_agent.as_str())
    }

    /// Look up `place` and return the best match.
    ///
    /// `Ok(None)` means the provider found nothing; transport, status and
    /// decoding failures are errors.
    pub async fn resolve(&self, place: &str) -> Result<Option<GeocodeMatch>, UpstreamError> {
        let url = format!("{}/search", self.base_url);

        let res = self
            .http
            .get(url)
            .header(header::USER_AGENT, self.user_agent.as_str())
            .query(&[
                ("format", "json"),
                ("q", place),
                ("limit", "1"),
                ("addressdetails", "1"),
            ])
            .send()
            .await
            .map_err(|source| UpstreamError::Request { provider: PROVIDER, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| UpstreamError::Request { provider: PROVIDER, source })?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                provider: PROVIDER,
                status,
                body: truncate_body(&body),
            });
        }

        let places: Vec<NominatimPlace> = serde_json::from_str(&body)
            .map_err(|source| UpstreamError::Decode { provider: PROVIDER, source })?;

        let Some(top) = places.into_iter().next() else {
            tracing::info!(place, "no geocoding results");
            return Ok(None);
        };

        let found = to_match(top)?;
        tracing::info!(place, city = %found.city, lat = found.latitude, lon = found.longitude, "geocoded");
        Ok(Some(found))
    }
}

fn to_match(place: NominatimPlace) -> Result<GeocodeMatch, UpstreamError> {
    let latitude = place
        .lat
        .trim()
        .parse::<f64>()
        .map_err(|_| UpstreamError::Shape { provider: PROVIDER, what: "a numeric `lat`" })?;
    let longitude = place
        .lon
        .trim()
        .parse::<f64>()
        .map_err(|_| UpstreamError::Shape { provider: PROVIDER, what: "a numeric `lon`" })?;

    let city = place
        .name
        .filter(|n| !n.is_empty())
        .or_else(|| {
            place
                .display_name
                .as_deref()
                .and_then(|d| d.split(',').next())
                .map(|s| s.trim().to_string())
        })
        .ok_or(UpstreamError::Shape { provider: PROVIDER, what: "a place name" })?;

    let (state, country) = match place.address {
        Some(addr) => (
            addr.state.filter(|s| !s.is_empty()),
            addr.country_code.map(|c| c.to_uppercase()).unwrap_or_default(),
        ),
        None => (None, String::new()),
    };

    Ok(GeocodeMatch { city, state, country, latitude, longitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: Option<&str>, display: Option<&str>) -> NominatimPlace {
        NominatimPlace {
            lat: "48.8588897".into(),
            lon: "2.3200410".into(),
            name: name.map(String::from),
            display_name: display.map(String::from),
            address: Some(NominatimAddress {
                state: Some("Ile-de-France".into()),
                country_code: Some("fr".into()),
            }),
        }
    }

    #[test]
    fn extracts_coordinates_and_uppercases_country() {
        let m = to_match(place(Some("Paris"), None)).expect("match");

        assert_eq!(m.city, "Paris");
        assert_eq!(m.state.as_deref(), Some("Ile-de-France"));
        assert_eq!(m.country, "FR");
        assert!((m.latitude - 48.8588897).abs() < 1e-9);
        assert!((m.longitude - 2.3200410).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_display_name() {
        let m = to_match(place(None, Some("Paris, Ile-de-France, France"))).expect("match");
        assert_eq!(m.city, "Paris");
    }

    #[test]
    fn non_numeric_latitude_is_a_shape_error() {
        let mut p = place(Some("Paris"), None);
        p.lat = "north".into();

        let err = to_match(p).unwrap_err();
        assert!(matches!(err, UpstreamError::Shape { .. }));
    }

    #[test]
    fn match_converts_into_store_input() {
        let input: LocationInput = to_match(place(Some("Paris"), None)).expect("match").into();

        assert_eq!(input.city.as_deref(), Some("Paris"));
        assert_eq!(input.country.as_deref(), Some("FR"));
        assert!(input.missing_fields().is_empty());
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use weather_widget_core::{Coordinates, LocationStore};

use crate::error::ServerError;
use crate::state::AppState;

const WEATHER_ERROR: &str = "Error fetching weather data";

pub const WEATHER_CACHE_CONTROL: &str = "public, max-age=900, stale-while-revalidate=300";

#[derive(Debug, Default)]
pub struct WeatherQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl From<HashMap<String, String>> for WeatherQuery {
    fn from(mut params: HashMap<String, String>) -> Self {
        Self { lat: params.remove("lat"), lon: params.remove("lon") }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/weather", get(get_weather))
}

/// `GET /api/weather?lat=&lon=` - current conditions for the given or the
/// stored coordinates. Never writes to the store. Every failure, including an
/// unusable query, is a 500 with a generic body.
pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<impl IntoResponse, ServerError> {
    let Query(params) = params.map_err(|e| ServerError::Internal {
        context: WEATHER_ERROR,
        message: e.body_text(),
    })?;
    let coords = resolve_coordinates(&WeatherQuery::from(params), &state.store)?;

    let snapshot = state
        .weather
        .fetch_current(coords)
        .await
        .map_err(|source| ServerError::Upstream { context: WEATHER_ERROR, source })?;

    Ok(([(header::CACHE_CONTROL, WEATHER_CACHE_CONTROL)], Json(snapshot)))
}

/// Coordinates from the query when both are given, otherwise from the store,
/// otherwise the built-in default.
fn resolve_coordinates(
    query: &WeatherQuery,
    store: &LocationStore,
) -> Result<Coordinates, ServerError> {
    if let (Some(lat), Some(lon)) = (present(&query.lat), present(&query.lon)) {
        return Ok(Coordinates::new(parse_degrees("lat", lat)?, parse_degrees("lon", lon)?));
    }

    match store.get() {
        Ok(record) => Ok(record.coordinates()),
        Err(e) => {
            tracing::warn!(error = %e, "stored location unavailable; using default coordinates");
            Ok(Coordinates::DEFAULT)
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_degrees(name: &str, value: &str) -> Result<f64, ServerError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ServerError::Internal {
            context: WEATHER_ERROR,
            message: format!("invalid `{name}` parameter: {value}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_widget_core::LocationInput;

    fn query(lat: Option<&str>, lon: Option<&str>) -> WeatherQuery {
        WeatherQuery { lat: lat.map(String::from), lon: lon.map(String::from) }
    }

    fn empty_store() -> (tempfile::TempDir, LocationStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocationStore::new(dir.path().join("location.json"));
        (dir, store)
    }

    #[test]
    fn explicit_coordinates_win() {
        let (_dir, store) = empty_store();
        let coords = resolve_coordinates(&query(Some("48.85"), Some("2.35")), &store).unwrap();

        assert_eq!(coords, Coordinates::new(48.85, 2.35));
    }

    #[test]
    fn one_missing_coordinate_uses_store() {
        let (_dir, store) = empty_store();
        store.set(LocationInput::new("Paris", 48.8566, 2.3522)).unwrap();

        let coords = resolve_coordinates(&query(Some("10"), None), &store).unwrap();
        assert_eq!(coords, Coordinates::new(48.8566, 2.3522));

        let coords = resolve_coordinates(&query(Some(""), Some("")), &store).unwrap();
        assert_eq!(coords, Coordinates::new(48.8566, 2.3522));
    }

    #[test]
    fn unreadable_store_falls_back_to_default() {
        let (_dir, store) = empty_store();

        let coords = resolve_coordinates(&WeatherQuery::default(), &store).unwrap();
        assert_eq!(coords, Coordinates::DEFAULT);
    }

    #[test]
    fn unusable_coordinates_are_internal_errors() {
        let (_dir, store) = empty_store();

        for lat in ["abc", "1e999", "NaN"] {
            let err = resolve_coordinates(&query(Some(lat), Some("2.35")), &store).unwrap_err();
            assert!(
                matches!(err, ServerError::Internal { context: WEATHER_ERROR, .. }),
                "lat={lat} should be an internal error"
            );
        }
    }

    #[test]
    fn query_map_picks_lat_and_lon() {
        let params = HashMap::from([
            ("lat".to_string(), "48.85".to_string()),
            ("units".to_string(), "metric".to_string()),
        ]);
        let q = WeatherQuery::from(params);

        assert_eq!(q.lat.as_deref(), Some("48.85"));
        assert_eq!(q.lon, None);
    }
}

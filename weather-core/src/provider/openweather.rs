use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, header};
use serde::Deserialize;

use crate::{
    error::{UpstreamError, truncate_body},
    model::{Conditions, Coordinates, SnapshotLocation, Temperature, WeatherSnapshot, Wind},
    provider::round_display,
};

use super::WeatherProvider;

const PROVIDER: &str = "OpenWeather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn request_current(&self, coords: Coordinates) -> Result<String, UpstreamError> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(url)
            .header(header::CACHE_CONTROL, "no-cache")
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("units", "imperial".to_string()),
                ("appid", self.api_key.clone()),
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

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
}

fn parse_current(body: &str, now: DateTime<Utc>) -> Result<WeatherSnapshot, UpstreamError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|source| UpstreamError::Decode { provider: PROVIDER, source })?;

    let condition = parsed
        .weather
        .into_iter()
        .next()
        .ok_or(UpstreamError::Shape { provider: PROVIDER, what: "weather[0]" })?;

    Ok(WeatherSnapshot {
        location: SnapshotLocation { city: parsed.name, country: parsed.sys.country },
        temperature: Temperature {
            current: round_display(parsed.main.temp),
            feels_like: round_display(parsed.main.feels_like),
            min: round_display(parsed.main.temp_min),
            max: round_display(parsed.main.temp_max),
        },
        weather: Conditions {
            main: condition.main,
            description: condition.description,
            icon: condition.icon,
        },
        wind: Wind {
            speed: round_display(parsed.wind.speed),
            deg: parsed.wind.deg.map(|d| d.round() as u16),
        },
        humidity: parsed.main.humidity,
        timestamp: now,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(&self, coords: Coordinates) -> Result<WeatherSnapshot, UpstreamError> {
        let body = self.request_current(coords).await?;
        let snapshot = parse_current(&body, Utc::now())?;

        tracing::debug!(
            city = %snapshot.location.city,
            temp = snapshot.temperature.current,
            "fetched current conditions"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(main: serde_json::Value) -> String {
        json!({
            "name": "Philadelphia",
            "dt": 1_700_000_000,
            "main": main,
            "weather": [
                { "id": 800, "main": "Clear", "description": "clear sky", "icon": "01n" },
                { "id": 701, "main": "Mist", "description": "mist", "icon": "50n" }
            ],
            "wind": { "speed": 4.9, "deg": 220 },
            "sys": { "country": "US" }
        })
        .to_string()
    }

    #[test]
    fn rounds_temperatures_and_wind() {
        let body = sample(json!({
            "temp": 72.4, "feels_like": 73.1, "temp_min": 67.5, "temp_max": 75.49, "humidity": 65
        }));
        let now = Utc::now();

        let snap = parse_current(&body, now).expect("parse");

        assert_eq!(snap.temperature.current, 72);
        assert_eq!(snap.temperature.feels_like, 73);
        assert_eq!(snap.temperature.min, 68);
        assert_eq!(snap.temperature.max, 75);
        assert_eq!(snap.wind.speed, 5);
        assert_eq!(snap.wind.deg, Some(220));
        assert_eq!(snap.humidity, 65);
        assert_eq!(snap.timestamp, now);
    }

    #[test]
    fn copies_first_condition_verbatim() {
        let body = sample(json!({
            "temp": 50.0, "feels_like": 48.0, "temp_min": 45.0, "temp_max": 52.0, "humidity": 80
        }));

        let snap = parse_current(&body, Utc::now()).expect("parse");

        assert_eq!(snap.weather.main, "Clear");
        assert_eq!(snap.weather.description, "clear sky");
        assert_eq!(snap.weather.icon, "01n");
        assert_eq!(snap.location.city, "Philadelphia");
        assert_eq!(snap.location.country, "US");
    }

    #[test]
    fn empty_condition_list_is_a_shape_error() {
        let body = json!({
            "name": "Nowhere",
            "main": { "temp": 1.0, "feels_like": 1.0, "temp_min": 1.0, "temp_max": 1.0, "humidity": 1 },
            "weather": [],
            "wind": { "speed": 1.0 },
            "sys": {}
        })
        .to_string();

        let err = parse_current(&body, Utc::now()).unwrap_err();
        assert!(matches!(err, UpstreamError::Shape { what: "weather[0]", .. }));
    }

    #[test]
    fn missing_sections_are_decode_errors() {
        for missing in ["main", "wind", "sys", "name", "weather"] {
            let mut value: serde_json::Value =
                serde_json::from_str(&sample(json!({
                    "temp": 1.0, "feels_like": 1.0, "temp_min": 1.0, "temp_max": 1.0, "humidity": 1
                })))
                .expect("json");
            value.as_object_mut().expect("object").remove(missing);

            let err = parse_current(&value.to_string(), Utc::now()).unwrap_err();
            assert!(
                matches!(err, UpstreamError::Decode { .. }),
                "removing `{missing}` should fail to decode"
            );
        }
    }
}

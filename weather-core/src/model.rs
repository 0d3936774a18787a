use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Philadelphia, used whenever no stored location can be read.
    pub const DEFAULT: Coordinates = Coordinates { latitude: 39.9526, longitude: -75.1652 };

    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// The single persisted "current location".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub last_updated: DateTime<Utc>,
    /// Fields posted by a client that this crate doesn't interpret. They are
    /// stored and echoed back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LocationRecord {
    pub fn default_at(now: DateTime<Utc>) -> Self {
        Self {
            city: "Philadelphia".to_string(),
            state: Some("PA".to_string()),
            country: "US".to_string(),
            latitude: Coordinates::DEFAULT.latitude,
            longitude: Coordinates::DEFAULT.longitude,
            last_updated: now,
            extra: Map::new(),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// "City, ST CC" the way the update tool prints it.
    pub fn label(&self) -> String {
        format!(
            "{}, {} {}",
            self.city,
            self.state.as_deref().unwrap_or_default(),
            self.country
        )
    }
}

/// A write payload for the location store. Every field is optional so that
/// validation can say exactly what is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInput {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Accepted and discarded; the store always stamps its own time.
    #[serde(default, skip_serializing)]
    pub last_updated: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LocationInput {
    pub fn new(city: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            city: Some(city.into()),
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Self::default()
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Names of the required fields that are absent or falsy: an empty city,
    /// or a zero / NaN coordinate.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.city.as_deref().is_none_or(str::is_empty) {
            missing.push("city");
        }
        if !is_truthy(self.latitude) {
            missing.push("latitude");
        }
        if !is_truthy(self.longitude) {
            missing.push("longitude");
        }
        missing
    }
}

fn is_truthy(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v != 0.0 && !v.is_nan())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotLocation {
    pub city: String,
    pub country: String,
}

/// Temperatures in °F, rounded to whole degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Temperature {
    pub current: i64,
    pub feels_like: i64,
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// mph, rounded.
    pub speed: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deg: Option<u16>,
}

/// Display-ready current conditions. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: SnapshotLocation,
    pub temperature: Temperature,
    pub weather: Conditions,
    pub wind: Wind,
    pub humidity: u8,
    /// When this snapshot was built, not the provider's observation time.
    pub timestamp: DateTime<Utc>,
}

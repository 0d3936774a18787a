//! Core library for the weather widget.
//!
//! This crate defines:
//! - Configuration loading (file + environment overrides)
//! - The single-record location store
//! - Clients for the upstream weather and geocoding providers
//! - The widget state machine used by display front-ends
//!
//! It is used by `weather-widget-server` and `weather-widget-cli`.

pub mod config;
pub mod error;
pub mod geocode;
pub mod model;
pub mod provider;
pub mod store;
pub mod widget;

pub use config::{Config, NominatimConfig, OpenWeatherConfig, ServerConfig};
pub use error::{StoreError, UpstreamError};
pub use geocode::{GeocodeMatch, NominatimClient};
pub use model::{Coordinates, LocationInput, LocationRecord, WeatherSnapshot};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use store::LocationStore;
pub use widget::{Widget, WeatherIcon};

//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use weather_widget_core::{LocationStore, WeatherProvider};

#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<LocationStore>,
    pub weather: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(store: LocationStore, weather: Arc<dyn WeatherProvider>) -> Self {
        Self { store: Arc::new(store), weather }
    }
}

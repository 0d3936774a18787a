//! HTTP surface of the weather widget.
//!
//! Exposes `GET/POST /api/location` over the location store and
//! `GET /api/weather` over a [`weather_widget_core::WeatherProvider`].

pub mod error;
pub mod routes;
pub mod state;

pub use error::ServerError;
pub use routes::build;
pub use state::AppState;

use crate::{error::UpstreamError, model::Coordinates, model::WeatherSnapshot};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A source of current conditions for a coordinate pair.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, coords: Coordinates) -> Result<WeatherSnapshot, UpstreamError>;
}

/// Round half away from zero, the same way for every displayed number.
pub(crate) fn round_display(value: f64) -> i64 {
    value.round() as i64
}

use crate::{
    Config, Coordinates, FetchError, WeatherRecord, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions for a coordinate.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, coords: Coordinates) -> Result<WeatherRecord, FetchError>;
}

/// Construct the weather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    Ok(Box::new(OpenWeatherProvider::with_base_url(
        api_key,
        &config.weather_base_url,
    )))
}

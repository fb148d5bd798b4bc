use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    config::DEFAULT_WEATHER_BASE_URL,
    error::{FetchError, truncate_body},
    model::{Coordinates, WeatherRecord},
};

use super::WeatherProvider;

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_WEATHER_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{CURRENT_WEATHER_PATH}", self.base_url)
    }

    async fn fetch_current(&self, coords: Coordinates) -> Result<WeatherRecord, FetchError> {
        let url = self.endpoint();
        debug!(%url, lat = coords.latitude, lon = coords.longitude, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.bytes().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status,
                body: truncate_body(&String::from_utf8_lossy(&body)),
            });
        }

        let json: Value = serde_json::from_slice(&body)
            .map_err(|e| FetchError::decode("weather response as JSON", e))?;

        if !json.is_object() {
            return Err(FetchError::decode(
                "weather response",
                "top-level JSON value is not an object",
            ));
        }

        let record = WeatherRecord::try_from(&json)?;
        info!(place = record.place(), icon = record.icon(), "fetched current weather");

        Ok(record)
    }
}

impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, coords: Coordinates) -> Result<WeatherRecord, FetchError> {
        self.fetch_current(coords).await
    }
}

use std::time::Duration;

use tracing::{instrument, warn};

use crate::{
    FetchError, WeatherRecord,
    icon::{IconImage, IconResolver},
    location::LocationProvider,
    provider::WeatherProvider,
};

/// Receives each stage's output as the chain progresses.
pub trait Renderer: Send + Sync {
    fn show_place(&self, label: &str);
    fn show_weather(&self, weather: &WeatherRecord);
    fn show_icon(&self, icon: &IconImage);
    fn show_error(&self, error: &FetchError);
}

/// location → weather → icon, rendering as it goes.
pub struct WeatherPipeline {
    location: Box<dyn LocationProvider>,
    provider: Box<dyn WeatherProvider>,
    icons: IconResolver,
    renderer: Box<dyn Renderer>,
}

impl WeatherPipeline {
    pub fn new(
        location: Box<dyn LocationProvider>,
        provider: Box<dyn WeatherProvider>,
        icons: IconResolver,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        Self {
            location,
            provider,
            icons,
            renderer,
        }
    }

    /// Run the chain once. Failures are rendered and returned, never retried.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<WeatherRecord, FetchError> {
        match self.run_chain().await {
            Ok(weather) => Ok(weather),
            Err(e) => {
                self.renderer.show_error(&e);
                Err(e)
            }
        }
    }

    async fn run_chain(&self) -> Result<WeatherRecord, FetchError> {
        let place = self.location.locate().await?;
        if let Some(label) = &place.label {
            self.renderer.show_place(label);
        }

        let weather = self.provider.current_weather(place.coords).await?;
        self.renderer.show_weather(&weather);

        let icon = self.icons.resolve(weather.icon()).await?;
        self.renderer.show_icon(&icon);

        Ok(weather)
    }

    /// Refresh now and then every `period`, whatever the previous outcome.
    ///
    /// Never returns; drop the future to stop.
    pub async fn run_every(&self, period: Duration) {
        loop {
            if let Err(e) = self.refresh().await {
                warn!(error = %e, "weather refresh failed");
            }
            tokio::time::sleep(period).await;
        }
    }
}

use crate::{
    Config,
    error::WeatherError,
    model::{Coordinates, PlaceCandidate, WeatherSample, WeatherSnapshot},
    provider::{
        demo::{DemoPlaces, DemoWeather},
        openweather::OpenWeatherClient,
    },
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use tracing::info;

pub mod demo;
pub mod geolocation;
pub mod openweather;

/// Where weather and place data come from; chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSource {
    /// OpenWeather REST API.
    Live,
    /// Built-in offline dataset.
    Static,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Live => "live",
            DataSource::Static => "static",
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current conditions and 3-hour forecasts for a place.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current_by_city(&self, city: &str) -> Result<WeatherSnapshot, WeatherError>;

    async fn current_by_coords(&self, at: Coordinates) -> Result<WeatherSnapshot, WeatherError>;

    /// Time-ordered 3-hour samples covering the next few days.
    async fn forecast_by_city(&self, city: &str) -> Result<Vec<WeatherSample>, WeatherError>;

    async fn forecast_by_coords(
        &self,
        at: Coordinates,
    ) -> Result<Vec<WeatherSample>, WeatherError>;
}

/// Forward geocoding of partial place names.
#[async_trait]
pub trait PlaceLookup: Send + Sync + Debug {
    /// Candidate places for `query`. No matches is an empty list, not an error.
    ///
    /// `limit` is a hint; the suggestion engine ranks and truncates itself.
    async fn lookup(&self, query: &str, limit: usize) -> Result<Vec<PlaceCandidate>, WeatherError>;
}

/// The pair of collaborators backing one data source.
#[derive(Debug, Clone)]
pub struct Sources {
    pub data_source: DataSource,
    pub weather: Arc<dyn WeatherSource>,
    pub places: Arc<dyn PlaceLookup>,
}

impl Sources {
    pub fn live(client: OpenWeatherClient) -> Self {
        let client = Arc::new(client);
        Self {
            data_source: DataSource::Live,
            weather: client.clone(),
            places: client,
        }
    }

    pub fn offline() -> Self {
        Self {
            data_source: DataSource::Static,
            weather: Arc::new(DemoWeather::new()),
            places: Arc::new(DemoPlaces),
        }
    }
}

/// Pick live or static sources from config: live when a usable API key is set.
pub fn sources_from_config(config: &Config) -> anyhow::Result<Sources> {
    let sources = match config.resolved_api_key() {
        Some(api_key) => {
            let client =
                OpenWeatherClient::new(api_key, &config.api_base_url, config.request_timeout())?;
            Sources::live(client)
        }
        None => Sources::offline(),
    };

    info!(data_source = %sources.data_source, "weather sources selected");
    Ok(sources)
}

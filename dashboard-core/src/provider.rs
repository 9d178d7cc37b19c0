use crate::{
    Config,
    error::{LookupError, WeatherError},
    model::{Coordinates, ForecastEntry, PlaceCandidate, WeatherSnapshot},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Upper bound on suggestions returned for one query.
pub const MAX_SUGGESTIONS: usize = 5;

/// Queries shorter than this never reach the lookup service.
pub const MIN_QUERY_CHARS: usize = 3;

/// Snapshot plus the coordinates the service resolved it for.
pub type CurrentConditions = (WeatherSnapshot, Coordinates);

/// Free-text place search, ranked by the provider.
#[async_trait]
pub trait GeoLookupClient: Send + Sync + Debug {
    async fn suggest(&self, query: &str) -> Result<Vec<PlaceCandidate>, LookupError>;
}

/// Current conditions and raw forecast retrieval.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn current_by_name(&self, city_name: &str) -> Result<CurrentConditions, WeatherError>;

    async fn current_by_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<CurrentConditions, WeatherError>;

    /// Raw forecast in ascending timestamp order, not yet windowed.
    async fn forecast(&self, coordinates: Coordinates) -> Result<Vec<ForecastEntry>, WeatherError>;
}

/// True when `query` is long enough to be sent to the lookup service.
pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

/// Construct the OpenWeather client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `weather-dashboard configure` and enter your API key."
        )
    })?;

    let client = match config.api_base.as_deref() {
        Some(base) => OpenWeatherClient::with_base_url(api_key.to_owned(), base),
        None => OpenWeatherClient::new(api_key.to_owned()),
    };

    Ok(client)
}

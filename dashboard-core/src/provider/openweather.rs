use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    error::{LookupError, WeatherError},
    model::{ConditionMain, Coordinates, ForecastEntry, PlaceCandidate, WeatherSnapshot},
    provider::{CurrentConditions, GeoLookupClient, MAX_SUGGESTIONS, WeatherClient, is_searchable},
};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the OpenWeather current, forecast and direct-geocoding endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> reqwest::Result<(StatusCode, String)> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "OpenWeather request");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        tracing::debug!(%url, %status, "OpenWeather response");

        Ok((status, body))
    }

    async fn fetch_weather<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, WeatherError> {
        let (status, body) = self.fetch(path, params).await?;

        match status {
            s if s.is_success() => {}
            StatusCode::NOT_FOUND => return Err(WeatherError::NotFound),
            StatusCode::TOO_MANY_REQUESTS => return Err(WeatherError::RateLimited),
            s => {
                return Err(WeatherError::Network(format!(
                    "OpenWeather returned status {}: {}",
                    s,
                    truncate_body(&body)
                )));
            }
        }

        serde_json::from_str(&body).map_err(|e| WeatherError::Malformed(e.to_string()))
    }

    async fn fetch_current(&self, params: &[(&str, &str)]) -> Result<CurrentConditions, WeatherError> {
        let parsed: OwCurrentResponse = self.fetch_weather("/data/2.5/weather", params).await?;
        parsed.into_conditions()
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn current_by_name(&self, city_name: &str) -> Result<CurrentConditions, WeatherError> {
        self.fetch_current(&[("q", city_name), ("units", "metric")]).await
    }

    async fn current_by_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<CurrentConditions, WeatherError> {
        let lat = coordinates.latitude.to_string();
        let lon = coordinates.longitude.to_string();

        self.fetch_current(&[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", "metric")])
            .await
    }

    async fn forecast(&self, coordinates: Coordinates) -> Result<Vec<ForecastEntry>, WeatherError> {
        let lat = coordinates.latitude.to_string();
        let lon = coordinates.longitude.to_string();

        let parsed: OwForecastResponse = self
            .fetch_weather(
                "/data/2.5/forecast",
                &[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", "metric")],
            )
            .await?;

        parsed.into_entries()
    }
}

#[async_trait]
impl GeoLookupClient for OpenWeatherClient {
    async fn suggest(&self, query: &str) -> Result<Vec<PlaceCandidate>, LookupError> {
        if !is_searchable(query) {
            return Err(LookupError::Invalid(format!("query '{query}' is too short")));
        }

        let limit = MAX_SUGGESTIONS.to_string();
        let (status, body) = self
            .fetch("/geo/1.0/direct", &[("q", query), ("limit", limit.as_str())])
            .await?;

        if !status.is_success() {
            return Err(LookupError::Network(format!(
                "OpenWeather geocoding returned status {}: {}",
                status,
                truncate_body(&body)
            )));
        }

        let places: Vec<OwPlace> =
            serde_json::from_str(&body).map_err(|e| LookupError::Invalid(e.to_string()))?;

        if places.is_empty() {
            return Err(LookupError::Empty);
        }

        Ok(places
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(OwPlace::into_candidate)
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    // Absent for coordinates outside any country (open sea).
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    coord: OwCoord,
    weather: Vec<OwCondition>,
    main: OwMain,
    wind: OwWind,
    #[serde(default)]
    sys: OwSys,
}

impl OwCurrentResponse {
    fn into_conditions(self) -> Result<CurrentConditions, WeatherError> {
        let coordinates = Coordinates::new(self.coord.lat, self.coord.lon).ok_or_else(|| {
            WeatherError::Malformed(format!(
                "coordinates out of range: {}, {}",
                self.coord.lat, self.coord.lon
            ))
        })?;

        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Malformed("missing weather condition".into()))?;

        let snapshot = WeatherSnapshot {
            place: self.name,
            country: self.sys.country,
            condition_main: ConditionMain::from(condition.main),
            condition_description: condition.description,
            icon_id: condition.icon,
            temperature_c: self.main.temp,
            humidity_pct: self.main.humidity,
            wind_speed_mps: self.wind.speed,
            observed_at: unix_to_utc(self.dt)?,
        };

        Ok((snapshot, coordinates))
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwCondition>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl OwForecastResponse {
    fn into_entries(self) -> Result<Vec<ForecastEntry>, WeatherError> {
        let mut entries = self
            .list
            .into_iter()
            .map(|entry| {
                let condition = entry.weather.into_iter().next().ok_or_else(|| {
                    WeatherError::Malformed("forecast entry without weather condition".into())
                })?;

                Ok(ForecastEntry {
                    timestamp: unix_to_utc(entry.dt)?,
                    condition_main: ConditionMain::from(condition.main),
                    icon_id: condition.icon,
                    temperature_c: entry.main.temp,
                })
            })
            .collect::<Result<Vec<_>, WeatherError>>()?;

        entries.sort_by_key(|e| e.timestamp);
        Ok(entries)
    }
}

#[derive(Debug, Deserialize)]
struct OwPlace {
    name: String,
    #[serde(default)]
    country: String,
    lat: f64,
    lon: f64,
}

impl OwPlace {
    fn into_candidate(self) -> PlaceCandidate {
        PlaceCandidate {
            display_name: self.name,
            country: self.country,
            coordinates: Coordinates::new(self.lat, self.lon),
        }
    }
}

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>, WeatherError> {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .ok_or_else(|| WeatherError::Malformed(format!("invalid timestamp {ts}")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let head: String = body.chars().take(MAX).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

//! Dashboard orchestration.
//!
//! The controller owns the [`SessionState`] and publishes it through a
//! `watch` channel. Every mutation replaces the aggregate under the channel's
//! lock, so observers never see a half-applied load. Responses are applied only
//! when their token is still the latest one for their category; anything older
//! is dropped.

use std::sync::Arc;
use tokio::sync::watch;

use crate::{
    Config,
    error::DashboardError,
    forecast,
    location::{ConfiguredLocator, DeviceLocator, LocationResolver},
    model::{Coordinates, ForecastEntry, PlaceCandidate, WeatherSnapshot},
    provider::{GeoLookupClient, WeatherClient, client_from_config, is_searchable},
    state::{LoadIntent, Phase, SessionState},
    theme::map_theme,
};

struct Resolved {
    snapshot: WeatherSnapshot,
    coordinates: Coordinates,
    forecast: Vec<ForecastEntry>,
}

#[derive(Debug, Clone)]
pub struct DashboardController {
    geo: Arc<dyn GeoLookupClient>,
    weather: Arc<dyn WeatherClient>,
    resolver: LocationResolver,
    popular: Arc<[PlaceCandidate]>,
    state: Arc<watch::Sender<SessionState>>,
}

impl DashboardController {
    pub fn new(
        geo: Arc<dyn GeoLookupClient>,
        weather: Arc<dyn WeatherClient>,
        locator: Arc<dyn DeviceLocator>,
        popular: Vec<PlaceCandidate>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::default());

        Self {
            geo,
            resolver: LocationResolver::new(locator, Arc::clone(&weather)),
            weather,
            popular: popular.into(),
            state: Arc::new(state),
        }
    }

    /// Wire the OpenWeather client and the configured device locator.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Arc::new(client_from_config(config)?);
        let locator = Arc::new(ConfiguredLocator::new(config.device.clone()));

        Ok(Self::new(client.clone(), client, locator, config.popular_cities()))
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Observe whole-state replacements.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn popular_cities(&self) -> &[PlaceCandidate] {
        &self.popular
    }

    /// Query text changed. Looks up suggestions once the text is long enough.
    pub async fn edit_query(&self, text: &str) {
        let text = text.to_string();

        if !is_searchable(&text) {
            self.state.send_modify(|s| {
                s.query_text = text;
                // Invalidates any lookup still in flight.
                s.tokens.next_suggestions();
                s.candidates.clear();
                s.suggestions_visible = false;
                if !s.phase.is_loading() {
                    s.phase = Phase::Idle;
                }
            });
            return;
        }

        let mut token = 0;
        self.state.send_modify(|s| {
            s.query_text = text.clone();
            token = s.tokens.next_suggestions();
            if !s.phase.is_loading() {
                s.phase = Phase::Searching;
            }
        });

        let result = self.geo.suggest(&text).await;

        self.state.send_if_modified(|s| {
            if s.tokens.suggestions != token {
                tracing::debug!(token, latest = s.tokens.suggestions, "Discarding stale suggestions");
                return false;
            }

            let loading = s.phase.is_loading();
            match result {
                Ok(candidates) => {
                    tracing::debug!(query = %text, count = candidates.len(), "Suggestions received");
                    s.candidates = candidates;
                    s.suggestions_visible = true;
                    if !loading {
                        s.phase = Phase::Suggesting;
                    }
                }
                Err(err) => {
                    tracing::debug!(query = %text, "Suggestion lookup failed: {}", err);
                    s.candidates.clear();
                    s.suggestions_visible = false;
                    if !loading {
                        s.phase = Phase::Idle;
                    }
                }
            }
            true
        });
    }

    /// Search button: load weather for the typed city name. Blank text is ignored.
    pub async fn search_typed(&self, text: &str) {
        let name = text.trim();
        if name.is_empty() {
            tracing::debug!("Ignoring blank search");
            return;
        }

        self.load(LoadIntent::Search(name.to_string())).await;
    }

    /// A suggestion or popular city was picked.
    pub async fn select_candidate(&self, candidate: PlaceCandidate) {
        self.load(LoadIntent::Select(candidate)).await;
    }

    /// Select the popular city at `index`. Returns `false` if there is none.
    pub async fn select_popular(&self, index: usize) -> bool {
        let Some(candidate) = self.popular.get(index).cloned() else {
            return false;
        };

        self.select_candidate(candidate).await;
        true
    }

    pub async fn use_current_location(&self) {
        self.load(LoadIntent::CurrentLocation).await;
    }

    /// Re-issue the last load if it failed. No-op outside the error phase.
    pub async fn retry(&self) {
        let intent = {
            let state = self.state.borrow();
            match (&state.phase, &state.last_intent) {
                (Phase::Error(_), Some(intent)) => intent.clone(),
                _ => return,
            }
        };

        self.load(intent).await;
    }

    async fn load(&self, intent: LoadIntent) {
        let mut token = 0;
        self.state.send_modify(|s| {
            token = s.tokens.next_weather();
            // A late suggestion response must not reopen the panel.
            s.tokens.next_suggestions();
            s.suggestions_visible = false;
            s.phase = Phase::Loading;
            if let LoadIntent::Select(candidate) = &intent {
                s.query_text = candidate.label();
            }
            s.last_intent = Some(intent.clone());
        });

        let outcome = self.resolve(&intent).await;

        self.state.send_if_modified(|s| {
            if s.tokens.weather != token {
                tracing::debug!(token, latest = s.tokens.weather, "Discarding stale weather response");
                return false;
            }

            match outcome {
                Ok(resolved) => {
                    tracing::info!(
                        place = %resolved.snapshot.location_label(),
                        coordinates = %resolved.coordinates,
                        "Weather loaded"
                    );
                    s.theme = map_theme(&resolved.snapshot.condition_main);
                    s.forecast_window = forecast::window(&resolved.forecast);
                    s.map_center = resolved.coordinates;
                    s.current_snapshot = Some(resolved.snapshot);
                    s.phase = Phase::Loaded;
                }
                Err(err) => {
                    tracing::warn!(intent = ?intent, "Weather load failed: {}", err);
                    s.phase = Phase::Error(err);
                }
            }
            true
        });
    }

    async fn resolve(&self, intent: &LoadIntent) -> Result<Resolved, DashboardError> {
        let (snapshot, coordinates) = match intent {
            LoadIntent::Search(name) => self.weather.current_by_name(name).await?,
            LoadIntent::Select(candidate) => self.resolver.by_selection(candidate).await?,
            LoadIntent::CurrentLocation => {
                let position = self.resolver.by_device().await?;
                let ((snapshot, coordinates), forecast) = tokio::try_join!(
                    self.weather.current_by_coordinates(position),
                    self.weather.forecast(position),
                )?;

                return Ok(Resolved { snapshot, coordinates, forecast });
            }
        };

        let forecast = self.weather.forecast(coordinates).await?;
        Ok(Resolved { snapshot, coordinates, forecast })
    }
}

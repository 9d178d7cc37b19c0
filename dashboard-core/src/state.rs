//! Session state owned by the dashboard controller.

use crate::{
    error::DashboardError,
    model::{Coordinates, ForecastEntry, PlaceCandidate, WeatherSnapshot},
    theme::ThemeId,
};

/// Map zoom before any location has been loaded.
pub const WORLD_ZOOM: u8 = 2;

/// Map zoom once a location is shown.
pub const LOCATION_ZOOM: u8 = 10;

/// Controller phase.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Searching,
    Suggesting,
    Loading,
    Loaded,
    Error(DashboardError),
}

impl Phase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Searching => "searching",
            Phase::Suggesting => "suggesting",
            Phase::Loading => "loading",
            Phase::Loaded => "loaded",
            Phase::Error(_) => "error",
        }
    }
}

/// Independent token sequences, one per request category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestTokens {
    pub suggestions: u64,
    pub weather: u64,
}

impl RequestTokens {
    pub fn next_suggestions(&mut self) -> u64 {
        self.suggestions += 1;
        self.suggestions
    }

    pub fn next_weather(&mut self) -> u64 {
        self.weather += 1;
        self.weather
    }
}

/// A user action that loads weather. Kept so a failed load can be retried.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadIntent {
    Search(String),
    Select(PlaceCandidate),
    CurrentLocation,
}

/// What the map widget is told to show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub marker: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub query_text: String,
    pub candidates: Vec<PlaceCandidate>,
    pub suggestions_visible: bool,
    pub current_snapshot: Option<WeatherSnapshot>,
    pub forecast_window: Vec<ForecastEntry>,
    pub map_center: Coordinates,
    pub theme: ThemeId,
    pub tokens: RequestTokens,
    pub phase: Phase,
    pub last_intent: Option<LoadIntent>,
}

impl SessionState {
    pub fn map_view(&self) -> MapView {
        if self.current_snapshot.is_some() {
            MapView {
                center: self.map_center,
                zoom: LOCATION_ZOOM,
                marker: Some(self.map_center),
            }
        } else {
            MapView {
                center: self.map_center,
                zoom: WORLD_ZOOM,
                marker: None,
            }
        }
    }

    pub fn error(&self) -> Option<&DashboardError> {
        match &self.phase {
            Phase::Error(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WeatherError;

    #[test]
    fn fresh_session_shows_world_view() {
        let state = SessionState::default();

        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.theme, ThemeId::Default);
        assert_eq!(
            state.map_view(),
            MapView { center: Coordinates::ORIGIN, zoom: WORLD_ZOOM, marker: None }
        );
        assert!(state.error().is_none());
    }

    #[test]
    fn token_sequences_are_independent() {
        let mut tokens = RequestTokens::default();
        assert_eq!(tokens.next_suggestions(), 1);
        assert_eq!(tokens.next_suggestions(), 2);
        assert_eq!(tokens.next_weather(), 1);
        assert_eq!(tokens, RequestTokens { suggestions: 2, weather: 1 });
    }

    #[test]
    fn error_phase_exposes_error() {
        let state = SessionState {
            phase: Phase::Error(WeatherError::RateLimited.into()),
            ..SessionState::default()
        };

        assert_eq!(state.phase.name(), "error");
        assert_eq!(state.error(), Some(&DashboardError::Weather(WeatherError::RateLimited)));
    }
}

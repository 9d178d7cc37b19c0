//! Core library for the `weather-dashboard` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Remote clients for place lookup, current conditions and forecasts
//! - Location resolution (device position or selected place)
//! - Theme mapping and forecast windowing
//! - The dashboard controller that sequences all of the above
//!
//! It is used by `dashboard-cli`, but can also drive any other presentation layer.

pub mod config;
pub mod controller;
pub mod error;
pub mod forecast;
pub mod location;
pub mod model;
pub mod provider;
pub mod state;
pub mod theme;

pub use config::{Config, DeviceConfig};
pub use controller::DashboardController;
pub use error::{DashboardError, GeolocationError, LookupError, WeatherError};
pub use location::{ConfiguredLocator, DeviceLocator, LocationResolver};
pub use model::{ConditionMain, Coordinates, ForecastEntry, PlaceCandidate, WeatherSnapshot};
pub use provider::{GeoLookupClient, OpenWeatherClient, WeatherClient};
pub use state::{LoadIntent, MapView, Phase, SessionState};
pub use theme::{ThemeId, map_theme};

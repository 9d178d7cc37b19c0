//! Error taxonomy shared by the remote clients, the location resolver and the
//! dashboard controller.

/// Failures of the as-you-type place lookup. Advisory only: the controller
/// never enters its error phase because of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Place lookup failed: {0}")]
    Network(String),
    #[error("Place lookup returned an unusable response: {0}")]
    Invalid(String),
    #[error("No places match the query")]
    Empty,
}

/// Failures of current-conditions and forecast retrieval.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeatherError {
    #[error("Weather request failed: {0}")]
    Network(String),
    #[error("Location not found")]
    NotFound,
    #[error("Weather service rate limit exceeded")]
    RateLimited,
    #[error("Weather response could not be parsed: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Network(err.to_string())
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Network(err.to_string())
    }
}

/// Failures of the single-shot device position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("Geolocation is not supported on this device")]
    Unsupported,
    #[error("Location permission denied")]
    Denied,
    #[error("Current position is unavailable")]
    Unavailable,
}

/// A load-bearing failure surfaced by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Weather(#[from] WeatherError),
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),
}

impl DashboardError {
    /// Short message suitable for showing to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            DashboardError::Weather(WeatherError::Network(_)) => {
                "Could not reach the weather service. Check your connection and try again."
            }
            DashboardError::Weather(WeatherError::NotFound) => {
                "City not found. Check the spelling and try again."
            }
            DashboardError::Weather(WeatherError::RateLimited) => {
                "Too many requests. Wait a moment and try again."
            }
            DashboardError::Weather(WeatherError::Malformed(_)) => {
                "The weather service returned an unexpected response."
            }
            DashboardError::Geolocation(GeolocationError::Unsupported) => {
                "Geolocation is not supported on this device."
            }
            DashboardError::Geolocation(GeolocationError::Denied) => {
                "Location access was denied."
            }
            DashboardError::Geolocation(GeolocationError::Unavailable) => {
                "Your current position is unavailable."
            }
        }
    }
}

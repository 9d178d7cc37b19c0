use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Neutral map center used before any location is resolved.
    pub const ORIGIN: Coordinates = Coordinates { latitude: 0.0, longitude: 0.0 };

    /// Returns `None` when either component is out of range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        valid.then_some(Self { latitude, longitude })
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A named location option, pending selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub display_name: String,
    pub country: String,
    pub coordinates: Option<Coordinates>,
}

impl PlaceCandidate {
    pub fn new(display_name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            country: country.into(),
            coordinates: None,
        }
    }

    /// Parse a `"Name, CC"` label. Everything after the first comma is the country.
    pub fn parse_label(label: &str) -> Option<Self> {
        let (name, country) = match label.split_once(',') {
            Some((name, country)) => (name.trim(), country.trim()),
            None => (label.trim(), ""),
        };

        if name.is_empty() {
            return None;
        }

        Some(Self::new(name, country))
    }

    /// Human-facing label, e.g. `Tokyo, JP`.
    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.display_name.clone()
        } else {
            format!("{}, {}", self.display_name, self.country)
        }
    }

    /// Query form accepted by the current-conditions endpoint, e.g. `Tokyo,JP`.
    pub fn query(&self) -> String {
        if self.country.is_empty() {
            self.display_name.clone()
        } else {
            format!("{},{}", self.display_name, self.country)
        }
    }
}

impl fmt::Display for PlaceCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Main weather group as reported by the remote service.
///
/// Unseen group names are kept verbatim in `Other` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionMain {
    Clear,
    Clouds,
    Rain,
    Thunderstorm,
    Drizzle,
    Snow,
    Mist,
    Haze,
    Other(String),
}

impl ConditionMain {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionMain::Clear => "Clear",
            ConditionMain::Clouds => "Clouds",
            ConditionMain::Rain => "Rain",
            ConditionMain::Thunderstorm => "Thunderstorm",
            ConditionMain::Drizzle => "Drizzle",
            ConditionMain::Snow => "Snow",
            ConditionMain::Mist => "Mist",
            ConditionMain::Haze => "Haze",
            ConditionMain::Other(raw) => raw,
        }
    }
}

impl From<&str> for ConditionMain {
    fn from(value: &str) -> Self {
        match value {
            "Clear" => ConditionMain::Clear,
            "Clouds" => ConditionMain::Clouds,
            "Rain" => ConditionMain::Rain,
            "Thunderstorm" => ConditionMain::Thunderstorm,
            "Drizzle" => ConditionMain::Drizzle,
            "Snow" => ConditionMain::Snow,
            "Mist" => ConditionMain::Mist,
            "Haze" => ConditionMain::Haze,
            other => ConditionMain::Other(other.to_string()),
        }
    }
}

impl From<String> for ConditionMain {
    fn from(value: String) -> Self {
        ConditionMain::from(value.as_str())
    }
}

impl From<ConditionMain> for String {
    fn from(value: ConditionMain) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ConditionMain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current-conditions reading for a resolved location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub place: String,
    pub country: String,
    pub condition_main: ConditionMain,
    pub condition_description: String,
    pub icon_id: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub observed_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    pub fn temperature_label(&self) -> String {
        format_temperature(self.temperature_c)
    }

    pub fn icon_url(&self) -> String {
        icon_url(&self.icon_id)
    }

    pub fn location_label(&self) -> String {
        if self.country.is_empty() {
            self.place.clone()
        } else {
            format!("{}, {}", self.place, self.country)
        }
    }
}

/// One step of the raw 3-hourly forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub condition_main: ConditionMain,
    pub icon_id: String,
    pub temperature_c: f64,
}

impl ForecastEntry {
    pub fn temperature_label(&self) -> String {
        format_temperature(self.temperature_c)
    }

    pub fn icon_url(&self) -> String {
        icon_url(&self.icon_id)
    }
}

fn format_temperature(celsius: f64) -> String {
    format!("{celsius:.1}°C")
}

fn icon_url(icon_id: &str) -> String {
    format!("{ICON_BASE_URL}/{icon_id}@2x.png")
}

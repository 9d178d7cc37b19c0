use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::PlaceCandidate;

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

const DEFAULT_POPULAR_CITIES: [&str; 4] = ["New York, US", "London, GB", "Tokyo, JP", "Paris, FR"];

/// Stand-in for the platform location service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Whether the user allows the dashboard to read the position.
    #[serde(default = "default_allow")]
    pub allow: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            allow: true,
        }
    }
}

fn default_allow() -> bool {
    true
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeather API key.
    pub api_key: Option<String>,

    /// Override of the OpenWeather base URL, e.g. for a local proxy.
    pub api_base: Option<String>,

    /// Example TOML:
    /// popular_cities = ["Berlin, DE", "Oslo, NO"]
    #[serde(default)]
    pub popular_cities: Vec<String>,

    /// Example TOML:
    /// [device]
    /// latitude = 48.85
    /// longitude = 2.35
    #[serde(default)]
    pub device: DeviceConfig,
}

impl Config {
    /// Returns the API key, preferring the environment over the file.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Configured popular cities, or the built-in list when none are set.
    pub fn popular_cities(&self) -> Vec<PlaceCandidate> {
        let parsed: Vec<PlaceCandidate> = self
            .popular_cities
            .iter()
            .filter_map(|label| PlaceCandidate::parse_label(label))
            .collect();

        if parsed.is_empty() {
            DEFAULT_POPULAR_CITIES
                .iter()
                .filter_map(|label| PlaceCandidate::parse_label(label))
                .collect()
        } else {
            parsed
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "weather-dashboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_popular_cities() {
        let cfg = Config::default();
        let labels: Vec<String> = cfg.popular_cities().iter().map(PlaceCandidate::label).collect();

        assert_eq!(labels, ["New York, US", "London, GB", "Tokyo, JP", "Paris, FR"]);
    }

    #[test]
    fn configured_popular_cities_override_defaults() {
        let cfg = Config {
            popular_cities: vec!["Berlin, DE".into(), " , XX".into(), "Oslo".into()],
            ..Config::default()
        };

        let cities = cfg.popular_cities();
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0], PlaceCandidate::new("Berlin", "DE"));
        assert_eq!(cities[1], PlaceCandidate::new("Oslo", ""));
    }

    #[test]
    fn parses_full_toml() {
        let cfg: Config = toml::from_str(
            r#"
            api_key = "KEY"
            api_base = "http://localhost:8080"
            popular_cities = ["Rome, IT"]

            [device]
            latitude = 41.9
            longitude = 12.5
            allow = false
            "#,
        )
        .expect("config should parse");

        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.api_base.as_deref(), Some("http://localhost:8080"));
        assert_eq!(cfg.device.latitude, Some(41.9));
        assert!(!cfg.device.allow);
    }

    #[test]
    fn device_section_defaults_to_allowed_without_position() {
        let cfg: Config = toml::from_str("api_key = \"KEY\"").expect("config should parse");

        assert!(cfg.device.allow);
        assert!(cfg.device.latitude.is_none());
        assert!(cfg.popular_cities.is_empty());
    }

    #[test]
    fn blank_file_key_is_ignored() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());

        if std::env::var_os(API_KEY_ENV).is_none() {
            assert_eq!(cfg.api_key(), None);
        }
    }
}

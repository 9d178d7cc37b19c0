//! Coordinate resolution, either from the device or from a selected place.

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{
    config::DeviceConfig,
    error::{GeolocationError, WeatherError},
    model::{Coordinates, PlaceCandidate},
    provider::{CurrentConditions, WeatherClient},
};

/// Single-shot platform position request.
#[async_trait]
pub trait DeviceLocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Position source backed by the `[device]` table of the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocator {
    device: DeviceConfig,
}

impl ConfiguredLocator {
    pub fn new(device: DeviceConfig) -> Self {
        Self { device }
    }
}

#[async_trait]
impl DeviceLocator for ConfiguredLocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        let (Some(lat), Some(lon)) = (self.device.latitude, self.device.longitude) else {
            return Err(GeolocationError::Unsupported);
        };

        if !self.device.allow {
            return Err(GeolocationError::Denied);
        }

        Coordinates::new(lat, lon).ok_or(GeolocationError::Unavailable)
    }
}

/// Produces coordinates for the weather lookup.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    locator: Arc<dyn DeviceLocator>,
    weather: Arc<dyn WeatherClient>,
}

impl LocationResolver {
    pub fn new(locator: Arc<dyn DeviceLocator>, weather: Arc<dyn WeatherClient>) -> Self {
        Self { locator, weather }
    }

    pub async fn by_device(&self) -> Result<Coordinates, GeolocationError> {
        let coordinates = self.locator.current_position().await?;
        tracing::info!(%coordinates, "Got device position");
        Ok(coordinates)
    }

    /// Resolve a candidate by name. The current-conditions lookup returns the
    /// coordinates too, so one call serves both.
    pub async fn by_selection(
        &self,
        candidate: &PlaceCandidate,
    ) -> Result<CurrentConditions, WeatherError> {
        self.weather.current_by_name(&candidate.query()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(latitude: Option<f64>, longitude: Option<f64>, allow: bool) -> ConfiguredLocator {
        ConfiguredLocator::new(DeviceConfig {
            latitude,
            longitude,
            allow,
        })
    }

    #[tokio::test]
    async fn missing_position_is_unsupported() {
        let err = device(None, None, true).current_position().await.unwrap_err();
        assert_eq!(err, GeolocationError::Unsupported);

        let err = device(Some(1.0), None, false).current_position().await.unwrap_err();
        assert_eq!(err, GeolocationError::Unsupported);
    }

    #[tokio::test]
    async fn declined_permission_is_denied() {
        let err = device(Some(48.85), Some(2.35), false).current_position().await.unwrap_err();
        assert_eq!(err, GeolocationError::Denied);
    }

    #[tokio::test]
    async fn invalid_position_is_unavailable() {
        let err = device(Some(123.0), Some(2.35), true).current_position().await.unwrap_err();
        assert_eq!(err, GeolocationError::Unavailable);
    }

    #[tokio::test]
    async fn configured_position_is_returned() {
        let coords = device(Some(48.85), Some(2.35), true).current_position().await.unwrap();
        assert_eq!(coords, Coordinates { latitude: 48.85, longitude: 2.35 });
    }
}

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use tracing::warn;

use crate::{error::WeatherError, model::Coordinates};

/// Source of the device's own position.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    /// Fails with `PermissionDenied`, `LocationUnavailable` or `LocationTimeout`.
    async fn locate(&self) -> Result<Coordinates, WeatherError>;
}

/// A geolocator that always answers with a configured position.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedGeolocator {
    position: Option<Coordinates>,
}

impl FixedGeolocator {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn locate(&self) -> Result<Coordinates, WeatherError> {
        self.position.ok_or(WeatherError::LocationUnavailable)
    }
}

/// Run `geolocator` with an upper bound on how long acquisition may take.
pub async fn locate_with_timeout(
    geolocator: &dyn Geolocator,
    timeout: Duration,
) -> Result<Coordinates, WeatherError> {
    match tokio::time::timeout(timeout, geolocator.locate()).await {
        Ok(result) => result,
        Err(_) => {
            warn!(?timeout, "location request timed out");
            Err(WeatherError::LocationTimeout)
        }
    }
}

use thiserror::Error;

/// Failures surfaced by weather, geocoding and geolocation collaborators.
///
/// An empty search is not an error; see [`crate::search::SearchOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// The weather source does not recognise the place.
    #[error("City \"{0}\" not found. Please check the spelling and try again.")]
    NotFound(String),

    #[error("Weather service request failed: {0}")]
    Transport(String),

    #[error("Failed to parse weather service response: {0}")]
    Parse(String),

    #[error("Location access denied by user")]
    PermissionDenied,

    #[error("Location information is unavailable")]
    LocationUnavailable,

    #[error("Location request timed out")]
    LocationTimeout,
}

impl WeatherError {
    /// True for the geolocation-specific failures.
    pub fn is_location_error(&self) -> bool {
        matches!(
            self,
            WeatherError::PermissionDenied
                | WeatherError::LocationUnavailable
                | WeatherError::LocationTimeout
        )
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            WeatherError::Parse(err.to_string())
        } else {
            WeatherError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::Parse(err.to_string())
    }
}

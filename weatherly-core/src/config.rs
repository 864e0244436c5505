use anyhow::{Context, Result, anyhow, ensure};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}, time::Duration};

use crate::{model::Coordinates, provider::DataSource, units::TemperatureUnit};

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Placeholder keys shipped in sample configs; treated as "no key".
const PLACEHOLDER_KEYS: &[&str] = &["demo_key", "your_api_key_here"];

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "metric"
/// default_city = "London"
///
/// [home]
/// latitude = 51.5074
/// longitude = -0.1278
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather API key. Without one the offline dataset is used.
    pub api_key: Option<String>,

    pub api_base_url: String,

    pub units: TemperatureUnit,

    /// Shown when the device location cannot be determined.
    pub default_city: String,

    pub forecast_days: usize,
    pub search_limit: usize,
    pub search_debounce_ms: u64,
    pub geolocation_timeout_secs: u64,
    pub request_timeout_secs: u64,

    /// Fixed device location, standing in for a geolocation service.
    pub home: Option<Coordinates>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: "https://api.openweathermap.org".to_string(),
            units: TemperatureUnit::Metric,
            default_city: "London".to_string(),
            forecast_days: crate::forecast::DEFAULT_FORECAST_DAYS,
            search_limit: 5,
            search_debounce_ms: 300,
            geolocation_timeout_secs: 10,
            request_timeout_secs: 15,
            home: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    ///
    /// A key in [`API_KEY_ENV`] takes precedence over the file.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            cfg.set_api_key(&key);
        }

        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg = Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherly", "weatherly")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=crate::forecast::DEFAULT_FORECAST_DAYS).contains(&self.forecast_days),
            "forecast_days must be between 1 and {}, got {}",
            crate::forecast::DEFAULT_FORECAST_DAYS,
            self.forecast_days
        );
        ensure!(self.search_limit > 0, "search_limit must be at least 1");
        ensure!(
            !self.default_city.trim().is_empty(),
            "default_city must not be empty"
        );
        Ok(())
    }

    /// The API key, unless it is missing, blank or a known placeholder.
    pub fn resolved_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !PLACEHOLDER_KEYS.contains(key))
    }

    pub fn data_source(&self) -> DataSource {
        if self.resolved_api_key().is_some() {
            DataSource::Live
        } else {
            DataSource::Static
        }
    }

    /// Store a trimmed key; a blank one clears it.
    pub fn set_api_key(&mut self, api_key: &str) {
        let api_key = api_key.trim();
        self.api_key = (!api_key.is_empty()).then(|| api_key.to_string());
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_secs(self.geolocation_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

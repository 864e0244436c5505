//! Core library for Weatherly.
//!
//! This crate defines:
//! - Place-name autocomplete with debouncing and stale-result suppression
//! - Reduction of 3-hour forecast feeds into daily and hourly views
//! - Live (OpenWeather) and offline weather/geocoding sources behind one interface
//! - Configuration, temperature units and the shared domain models
//!
//! It is used by `weatherly-cli`, but any UI shell can drive it.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod gate;
pub mod model;
pub mod provider;
pub mod search;
pub mod units;

pub use config::Config;
pub use dashboard::{Dashboard, DashboardView};
pub use error::WeatherError;
pub use forecast::{bucketize_daily, hourly_window};
pub use model::{Coordinates, DayBucket, PlaceCandidate, WeatherSample, WeatherSnapshot};
pub use provider::{DataSource, PlaceLookup, Sources, WeatherSource, sources_from_config};
pub use search::{
    SearchOutcome, SearchSession, SuggestionCursor, SuggestionEngine, rank_candidates,
};
pub use units::{TemperatureUnit, format_temperature, to_display_unit};

//! Loads everything one dashboard screen shows: current conditions, the
//! hourly strip and the daily forecast, plus a few featured cities.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, TimeZone};
use tracing::{debug, warn};

use crate::{
    Config,
    error::WeatherError,
    forecast::{DEFAULT_HOURLY_SLOTS, bucketize_daily, hourly_window},
    gate::RequestGate,
    model::{Coordinates, DayBucket, WeatherSample, WeatherSnapshot},
    provider::{
        Sources, WeatherSource,
        geolocation::{FixedGeolocator, Geolocator, locate_with_timeout},
    },
};

/// Everything rendered for one place.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub snapshot: WeatherSnapshot,
    pub hourly: Vec<WeatherSample>,
    pub daily: Vec<DayBucket>,
    /// Set when the device location failed and the default city is shown.
    pub notice: Option<WeatherError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturedCity {
    pub name: &'static str,
    pub country: &'static str,
}

impl FeaturedCity {
    /// "Name,CC", which pins the country for the weather lookup.
    pub fn query(&self) -> String {
        format!("{},{}", self.name, self.country)
    }
}

const fn featured(name: &'static str, country: &'static str) -> FeaturedCity {
    FeaturedCity { name, country }
}

pub const FEATURED_CITIES: &[FeaturedCity] = &[
    featured("London", "GB"),
    featured("Paris", "FR"),
    featured("Berlin", "DE"),
    featured("Madrid", "ES"),
    featured("Rome", "IT"),
    featured("Amsterdam", "NL"),
    featured("Stockholm", "SE"),
    featured("Oslo", "NO"),
    featured("Copenhagen", "DK"),
    featured("Vienna", "AT"),
    featured("Prague", "CZ"),
    featured("Budapest", "HU"),
    featured("Barcelona", "ES"),
    featured("Munich", "DE"),
    featured("Milan", "IT"),
    featured("New York", "US"),
    featured("Los Angeles", "US"),
    featured("Chicago", "US"),
    featured("Miami", "US"),
    featured("Las Vegas", "US"),
    featured("San Francisco", "US"),
    featured("Seattle", "US"),
    featured("Toronto", "CA"),
    featured("Vancouver", "CA"),
    featured("Mexico City", "MX"),
    featured("Tokyo", "JP"),
    featured("Seoul", "KR"),
    featured("Beijing", "CN"),
    featured("Shanghai", "CN"),
    featured("Hong Kong", "HK"),
    featured("Singapore", "SG"),
    featured("Bangkok", "TH"),
    featured("Mumbai", "IN"),
    featured("Delhi", "IN"),
    featured("Manila", "PH"),
    featured("Sydney", "AU"),
    featured("Melbourne", "AU"),
    featured("Dubai", "AE"),
    featured("Cairo", "EG"),
    featured("Cape Town", "ZA"),
    featured("São Paulo", "BR"),
    featured("Buenos Aires", "AR"),
    featured("Santiago", "CL"),
    featured("Istanbul", "TR"),
];

/// The `count` featured cities for refresh number `rotation`.
///
/// Successive rotations walk through the whole list before repeating.
pub fn featured_cities(rotation: usize, count: usize) -> Vec<&'static FeaturedCity> {
    let len = FEATURED_CITIES.len();
    let start = rotation.wrapping_mul(count) % len;
    FEATURED_CITIES
        .iter()
        .cycle()
        .skip(start)
        .take(count.min(len))
        .collect()
}

/// Current weather for a featured city; `None` when its lookup failed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturedWeather {
    pub city: &'static FeaturedCity,
    pub snapshot: Option<WeatherSnapshot>,
}

#[derive(Debug)]
pub struct Dashboard {
    weather: Arc<dyn WeatherSource>,
    geolocator: Arc<dyn Geolocator>,
    gate: RequestGate,
    default_city: String,
    forecast_days: usize,
    geolocation_timeout: Duration,
}

impl Dashboard {
    pub fn new(
        weather: Arc<dyn WeatherSource>,
        geolocator: Arc<dyn Geolocator>,
        config: &Config,
    ) -> Self {
        Self {
            weather,
            geolocator,
            gate: RequestGate::new(),
            default_city: config.default_city.clone(),
            forecast_days: config.forecast_days,
            geolocation_timeout: config.geolocation_timeout(),
        }
    }

    /// Dashboard over `sources`, located at the configured home position.
    pub fn from_config(sources: &Sources, config: &Config) -> Self {
        let geolocator = Arc::new(FixedGeolocator::new(config.home));
        Self::new(sources.weather.clone(), geolocator, config)
    }

    /// Load the dashboard for a named city.
    ///
    /// `Ok(None)` means a newer load was started meanwhile and this result
    /// must not be shown.
    pub async fn load_city<Tz: TimeZone>(
        &self,
        city: &str,
        now: &DateTime<Tz>,
    ) -> Result<Option<DashboardView>, WeatherError> {
        let ticket = self.gate.issue();
        let fetched = self.fetch_city(city).await;

        if !self.gate.settle(ticket) {
            debug!(city, "dropping superseded dashboard load");
            return Ok(None);
        }

        let (snapshot, samples) = fetched?;
        Ok(Some(self.view(snapshot, samples, now, None)))
    }

    /// Load the dashboard for the device location.
    ///
    /// If the location cannot be determined, the default city is loaded
    /// instead and the location error is kept as the view's notice.
    pub async fn load_here<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<Option<DashboardView>, WeatherError> {
        let ticket = self.gate.issue();

        let located = locate_with_timeout(self.geolocator.as_ref(), self.geolocation_timeout).await;
        let fetched = match located {
            Ok(at) => self.fetch_coords(at).await.map(|data| (data, None)),
            Err(err) => {
                warn!(error = %err, fallback = %self.default_city, "falling back to default city");
                self.fetch_city(&self.default_city)
                    .await
                    .map(|data| (data, Some(err)))
            }
        };

        if !self.gate.settle(ticket) {
            debug!("dropping superseded dashboard load");
            return Ok(None);
        }

        let ((snapshot, samples), notice) = fetched?;
        Ok(Some(self.view(snapshot, samples, now, notice)))
    }

    /// Current weather for the featured cities of refresh number `rotation`.
    pub async fn featured(&self, rotation: usize, count: usize) -> Vec<FeaturedWeather> {
        let mut out = Vec::with_capacity(count);
        for city in featured_cities(rotation, count) {
            let snapshot = match self.weather.current_by_city(&city.query()).await {
                Ok(snapshot) => Some(snapshot),
                Err(err) => {
                    warn!(city = city.name, error = %err, "featured city lookup failed");
                    None
                }
            };
            out.push(FeaturedWeather { city, snapshot });
        }
        out
    }

    async fn fetch_city(
        &self,
        city: &str,
    ) -> Result<(WeatherSnapshot, Vec<WeatherSample>), WeatherError> {
        tokio::try_join!(
            self.weather.current_by_city(city),
            self.weather.forecast_by_city(city)
        )
    }

    async fn fetch_coords(
        &self,
        at: Coordinates,
    ) -> Result<(WeatherSnapshot, Vec<WeatherSample>), WeatherError> {
        tokio::try_join!(
            self.weather.current_by_coords(at),
            self.weather.forecast_by_coords(at)
        )
    }

    fn view<Tz: TimeZone>(
        &self,
        snapshot: WeatherSnapshot,
        samples: Vec<WeatherSample>,
        now: &DateTime<Tz>,
        notice: Option<WeatherError>,
    ) -> DashboardView {
        DashboardView {
            hourly: hourly_window(&samples, DEFAULT_HOURLY_SLOTS).to_vec(),
            daily: bucketize_daily(&samples, self.forecast_days, now),
            snapshot,
            notice,
        }
    }
}

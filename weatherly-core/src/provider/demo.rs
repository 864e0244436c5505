//! Offline dataset used when no API key is configured.
//!
//! Serves the same contracts as the live adapter: place suggestions from a
//! fixed list of world cities, and a canned London observation and forecast
//! renamed to whatever city was asked for.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    error::WeatherError,
    model::{Coordinates, PlaceCandidate, WeatherSample, WeatherSnapshot},
    provider::{PlaceLookup, WeatherSource},
    search,
};

#[derive(Debug, Clone, Copy)]
pub struct DemoCity {
    pub name: &'static str,
    pub country: &'static str,
    pub region: Option<&'static str>,
    pub latitude: f64,
    pub longitude: f64,
}

const fn city(
    name: &'static str,
    country: &'static str,
    latitude: f64,
    longitude: f64,
) -> DemoCity {
    DemoCity {
        name,
        country,
        region: None,
        latitude,
        longitude,
    }
}

const fn city_in(
    name: &'static str,
    region: &'static str,
    country: &'static str,
    latitude: f64,
    longitude: f64,
) -> DemoCity {
    DemoCity {
        name,
        country,
        region: Some(region),
        latitude,
        longitude,
    }
}

pub const DEMO_CITIES: &[DemoCity] = &[
    // Europe
    city_in("London", "England", "GB", 51.5074, -0.1278),
    city("Paris", "FR", 48.8566, 2.3522),
    city("Berlin", "DE", 52.5200, 13.4050),
    city("Madrid", "ES", 40.4168, -3.7038),
    city("Rome", "IT", 41.9028, 12.4964),
    city("Barcelona", "ES", 41.3851, 2.1734),
    city("Amsterdam", "NL", 52.3676, 4.9041),
    city("Vienna", "AT", 48.2082, 16.3738),
    city("Prague", "CZ", 50.0755, 14.4378),
    city("Stockholm", "SE", 59.3293, 18.0686),
    city("Oslo", "NO", 59.9139, 10.7522),
    city("Copenhagen", "DK", 55.6761, 12.5683),
    city("Warsaw", "PL", 52.2297, 21.0122),
    city("Budapest", "HU", 47.4979, 19.0402),
    city("Istanbul", "TR", 41.0082, 28.9784),
    city("Athens", "GR", 37.9838, 23.7275),
    city("Lisbon", "PT", 38.7223, -9.1393),
    city("Dublin", "IE", 53.3498, -6.2603),
    city("Brussels", "BE", 50.8503, 4.3517),
    city("Zurich", "CH", 47.3769, 8.5417),
    city("Munich", "DE", 48.1351, 11.5820),
    // North America
    city_in("New York", "New York", "US", 40.7128, -74.0060),
    city_in("Los Angeles", "California", "US", 34.0522, -118.2437),
    city_in("Chicago", "Illinois", "US", 41.8781, -87.6298),
    city_in("Toronto", "Ontario", "CA", 43.6532, -79.3832),
    city_in("Vancouver", "British Columbia", "CA", 49.2827, -123.1207),
    city_in("Miami", "Florida", "US", 25.7617, -80.1918),
    city_in("San Francisco", "California", "US", 37.7749, -122.4194),
    city_in("Seattle", "Washington", "US", 47.6062, -122.3321),
    city_in("Boston", "Massachusetts", "US", 42.3601, -71.0589),
    city_in(
        "Washington",
        "District of Columbia",
        "US",
        38.9072,
        -77.0369,
    ),
    city_in("Las Vegas", "Nevada", "US", 36.1699, -115.1398),
    city("Mexico City", "MX", 19.4326, -99.1332),
    // Asia
    city("Tokyo", "JP", 35.6762, 139.6503),
    city("Seoul", "KR", 37.5665, 126.9780),
    city("Beijing", "CN", 39.9042, 116.4074),
    city("Shanghai", "CN", 31.2304, 121.4737),
    city("Mumbai", "IN", 19.0760, 72.8777),
    city("Delhi", "IN", 28.7041, 77.1025),
    city("Bangkok", "TH", 13.7563, 100.5018),
    city("Singapore", "SG", 1.3521, 103.8198),
    city("Hong Kong", "HK", 22.3193, 114.1694),
    city("Manila", "PH", 14.5995, 120.9842),
    city("Jakarta", "ID", -6.2088, 106.8456),
    city("Kuala Lumpur", "MY", 3.1390, 101.6869),
    // Oceania
    city("Sydney", "AU", -33.8688, 151.2093),
    city("Melbourne", "AU", -37.8136, 144.9631),
    city("Brisbane", "AU", -27.4698, 153.0251),
    city("Perth", "AU", -31.9505, 115.8605),
    city("Auckland", "NZ", -36.8485, 174.7633),
    // South America
    city("São Paulo", "BR", -23.5505, -46.6333),
    city("Rio de Janeiro", "BR", -22.9068, -43.1729),
    city("Buenos Aires", "AR", -34.6118, -58.3960),
    city("Santiago", "CL", -33.4489, -70.6693),
    city("Lima", "PE", -12.0464, -77.0428),
    city("Bogotá", "CO", 4.7110, -74.0721),
    // Africa & Middle East
    city("Cairo", "EG", 30.0444, 31.2357),
    city("Lagos", "NG", 6.5244, 3.3792),
    city("Cape Town", "ZA", -33.9249, 18.4241),
    city("Johannesburg", "ZA", -26.2041, 28.0473),
    city("Dubai", "AE", 25.2048, 55.2708),
    city("Tel Aviv", "IL", 32.0853, 34.7818),
    city("Casablanca", "MA", 33.5731, -7.5898),
];

impl DemoCity {
    pub fn to_candidate(&self) -> PlaceCandidate {
        PlaceCandidate {
            name: self.name.to_string(),
            country: self.country.to_string(),
            region: self.region.map(str::to_string),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Find a demo city by the leading name part of a "Name,CC" style query.
pub fn find_city(query: &str) -> Option<&'static DemoCity> {
    let name = query.split(',').next().unwrap_or_default().trim();
    DEMO_CITIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Place suggestions from [`DEMO_CITIES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoPlaces;

#[async_trait]
impl PlaceLookup for DemoPlaces {
    /// Returns every matching city; ranking and truncation happen in the engine.
    async fn lookup(
        &self,
        query: &str,
        _limit: usize,
    ) -> Result<Vec<PlaceCandidate>, WeatherError> {
        let needle = query.trim().to_lowercase();
        Ok(DEMO_CITIES
            .iter()
            .map(DemoCity::to_candidate)
            .filter(|c| search::matches(&needle, c))
            .collect())
    }
}

/// Canned weather data, anchored to the current time.
#[derive(Debug, Clone, Default)]
pub struct DemoWeather {
    anchor: Option<DateTime<Utc>>,
}

/// London, broken clouds.
const DEMO_OBSERVATION_EPOCH: i64 = 1_703_097_600;

struct Slot {
    temp: f64,
    feels_like: f64,
    min: f64,
    max: f64,
    humidity: u8,
    description: &'static str,
    icon: &'static str,
    pop: f64,
}

const fn slot(
    temp: f64,
    feels_like: f64,
    humidity: u8,
    description: &'static str,
    icon: &'static str,
    pop: f64,
) -> Slot {
    Slot {
        temp,
        feels_like,
        min: temp - 2.0,
        max: temp + 2.0,
        humidity,
        description,
        icon,
        pop,
    }
}

const FORECAST_TEMPLATE: &[Slot] = &[
    slot(17.0, 16.2, 75, "broken clouds", "04d", 0.2),
    slot(16.0, 15.1, 78, "scattered clouds", "03d", 0.1),
    slot(15.0, 14.2, 80, "few clouds", "02n", 0.05),
    slot(14.0, 13.1, 82, "clear sky", "01n", 0.0),
    slot(13.0, 12.2, 85, "clear sky", "01n", 0.0),
    slot(18.0, 17.3, 70, "few clouds", "02d", 0.1),
    slot(21.0, 20.4, 65, "scattered clouds", "03d", 0.15),
    slot(20.0, 19.5, 68, "broken clouds", "04d", 0.2),
    slot(19.0, 18.6, 72, "overcast clouds", "04d", 0.25),
    slot(16.0, 15.7, 78, "light rain", "10n", 0.4),
    slot(15.0, 14.8, 82, "moderate rain", "10n", 0.6),
    slot(14.0, 13.9, 85, "light rain", "10n", 0.3),
];

/// Length of the demo feed: five days of 3-hour slots.
pub const DEMO_FORECAST_SLOTS: usize = 40;

const SLOT_SECONDS: i64 = 3 * 3600;

impl DemoWeather {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the instant the demo forecast starts from.
    pub fn anchored_at(anchor: DateTime<Utc>) -> Self {
        Self {
            anchor: Some(anchor),
        }
    }

    fn anchor(&self) -> DateTime<Utc> {
        self.anchor.unwrap_or_else(Utc::now)
    }

    fn snapshot(&self, name: &str, country: &str, coordinates: Coordinates) -> WeatherSnapshot {
        let observed =
            DateTime::<Utc>::from_timestamp(DEMO_OBSERVATION_EPOCH, 0).unwrap_or_default();
        WeatherSnapshot {
            place_name: name.to_string(),
            country: country.to_string(),
            coordinates,
            temperature_c: 17.0,
            feels_like_c: 16.2,
            min_c: 15.0,
            max_c: 19.0,
            humidity_pct: 75,
            pressure_hpa: 1013,
            description: "broken clouds".to_string(),
            condition_icon: "04d".to_string(),
            wind_speed_mps: 3.5,
            wind_deg: 240,
            visibility_m: Some(10_000),
            sunrise: DateTime::<Utc>::from_timestamp(1_703_061_600, 0).unwrap_or(observed),
            sunset: DateTime::<Utc>::from_timestamp(1_703_091_200, 0).unwrap_or(observed),
            observation_time: self.anchor(),
            utc_offset_seconds: 0,
        }
    }

    /// The canned feed, starting at the 3-hour slot containing the anchor.
    pub fn forecast(&self) -> Vec<WeatherSample> {
        let start = self.anchor().timestamp().div_euclid(SLOT_SECONDS) * SLOT_SECONDS;
        (0..DEMO_FORECAST_SLOTS)
            .map(|i| {
                let slot = &FORECAST_TEMPLATE[i % FORECAST_TEMPLATE.len()];
                WeatherSample {
                    epoch_seconds: start + i as i64 * SLOT_SECONDS,
                    temperature_c: slot.temp,
                    feels_like_c: slot.feels_like,
                    min_c: slot.min,
                    max_c: slot.max,
                    humidity_pct: slot.humidity,
                    condition_icon: slot.icon.to_string(),
                    description: slot.description.to_string(),
                    precipitation_probability: slot.pop,
                    wind_speed: 3.5,
                }
            })
            .collect()
    }
}

#[async_trait]
impl WeatherSource for DemoWeather {
    async fn current_by_city(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        debug!(city, "serving demo observation");
        let snapshot = match find_city(city) {
            Some(known) => self.snapshot(
                known.name,
                known.country,
                Coordinates::new(known.latitude, known.longitude),
            ),
            None => self.snapshot(city.trim(), "GB", Coordinates::new(51.5085, -0.1257)),
        };
        Ok(snapshot)
    }

    async fn current_by_coords(&self, _at: Coordinates) -> Result<WeatherSnapshot, WeatherError> {
        let london = Coordinates::new(51.5085, -0.1257);
        Ok(self.snapshot("London", "GB", london))
    }

    async fn forecast_by_city(&self, _city: &str) -> Result<Vec<WeatherSample>, WeatherError> {
        Ok(self.forecast())
    }

    async fn forecast_by_coords(
        &self,
        _at: Coordinates,
    ) -> Result<Vec<WeatherSample>, WeatherError> {
        Ok(self.forecast())
    }
}

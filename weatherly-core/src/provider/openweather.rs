use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    error::WeatherError,
    model::{Coordinates, PlaceCandidate, WeatherSample, WeatherSnapshot},
    provider::{PlaceLookup, WeatherSource},
};

/// Most results the geocoding endpoint will return per call.
const GEOCODE_MAX_RESULTS: usize = 10;

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

/// What a request is looking up; decides how a 404 is reported.
#[derive(Clone, Copy)]
enum Target<'a> {
    City(&'a str),
    Coords(Coordinates),
    Search,
}

impl OpenWeatherClient {
    /// `base_url` is the API origin, e.g. `https://api.openweathermap.org`.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Transport(e.to_string()))?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        target: Target<'_>,
        extra: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let url = format!("{}{}", self.base_url, path);

        let mut query: Vec<(&str, String)> = vec![("appid", self.api_key.clone())];
        match target {
            Target::City(city) => query.push(("q", city.to_string())),
            Target::Coords(at) => {
                query.push(("lat", at.latitude.to_string()));
                query.push(("lon", at.longitude.to_string()));
            }
            Target::Search => {}
        }
        query.extend(extra.iter().cloned());

        let res = self.http.get(&url).query(&query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            warn!(%status, path, "OpenWeather request failed");
            return Err(match (status, target) {
                (StatusCode::NOT_FOUND, Target::City(city)) => {
                    WeatherError::NotFound(city.to_string())
                }
                _ => WeatherError::Transport(format!(
                    "{path} failed with status {status}: {}",
                    truncate_body(&body)
                )),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_current(&self, target: Target<'_>) -> Result<WeatherSnapshot, WeatherError> {
        let parsed: OwCurrentResponse = self
            .get("/data/2.5/weather", target, &metric())
            .await?;
        Ok(parsed.into_snapshot())
    }

    async fn fetch_forecast(&self, target: Target<'_>) -> Result<Vec<WeatherSample>, WeatherError> {
        let parsed: OwForecastResponse = self
            .get("/data/2.5/forecast", target, &metric())
            .await?;

        let mut samples: Vec<WeatherSample> = parsed
            .list
            .into_iter()
            .map(OwForecastEntry::into_sample)
            .collect();
        samples.sort_by_key(|s| s.epoch_seconds);
        debug!(samples = samples.len(), "forecast received");
        Ok(samples)
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    #[serde(default)]
    pressure: u32,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: u16,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    coord: OwCoord,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: Option<u32>,
    sys: OwSys,
    #[serde(default)]
    timezone: i32,
}

impl OwCurrentResponse {
    fn into_snapshot(self) -> WeatherSnapshot {
        let (description, condition_icon) = first_condition(self.weather);
        let observation_time = unix_to_utc(self.dt).unwrap_or_else(Utc::now);

        WeatherSnapshot {
            place_name: self.name,
            country: self.sys.country,
            coordinates: Coordinates::new(self.coord.lat, self.coord.lon),
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            min_c: self.main.temp_min,
            max_c: self.main.temp_max,
            humidity_pct: self.main.humidity,
            pressure_hpa: self.main.pressure,
            description,
            condition_icon,
            wind_speed_mps: self.wind.speed,
            wind_deg: self.wind.deg,
            visibility_m: self.visibility,
            sunrise: unix_to_utc(self.sys.sunrise).unwrap_or(observation_time),
            sunset: unix_to_utc(self.sys.sunset).unwrap_or(observation_time),
            observation_time,
            utc_offset_seconds: self.timezone,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    pop: f64,
}

impl OwForecastEntry {
    fn into_sample(self) -> WeatherSample {
        let (description, condition_icon) = first_condition(self.weather);
        WeatherSample {
            epoch_seconds: self.dt,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            min_c: self.main.temp_min,
            max_c: self.main.temp_max,
            humidity_pct: self.main.humidity,
            condition_icon,
            description,
            precipitation_probability: self.pop.clamp(0.0, 1.0),
            wind_speed: self.wind.speed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeocodeResult {
    name: String,
    lat: f64,
    lon: f64,
    country: String,
    state: Option<String>,
}

impl From<OwGeocodeResult> for PlaceCandidate {
    fn from(r: OwGeocodeResult) -> Self {
        PlaceCandidate {
            name: r.name,
            country: r.country,
            region: r.state,
            latitude: r.lat,
            longitude: r.lon,
        }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn current_by_city(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        self.fetch_current(Target::City(city)).await
    }

    #[instrument(skip(self))]
    async fn current_by_coords(&self, at: Coordinates) -> Result<WeatherSnapshot, WeatherError> {
        self.fetch_current(Target::Coords(at)).await
    }

    #[instrument(skip(self))]
    async fn forecast_by_city(&self, city: &str) -> Result<Vec<WeatherSample>, WeatherError> {
        self.fetch_forecast(Target::City(city)).await
    }

    #[instrument(skip(self))]
    async fn forecast_by_coords(
        &self,
        at: Coordinates,
    ) -> Result<Vec<WeatherSample>, WeatherError> {
        self.fetch_forecast(Target::Coords(at)).await
    }
}

#[async_trait]
impl PlaceLookup for OpenWeatherClient {
    /// Over-fetches so that dedup and tiering still leave `limit` results.
    #[instrument(skip(self))]
    async fn lookup(&self, query: &str, limit: usize) -> Result<Vec<PlaceCandidate>, WeatherError> {
        let fetch = (limit * 2).clamp(1, GEOCODE_MAX_RESULTS);
        let results: Vec<OwGeocodeResult> = self
            .get(
                "/geo/1.0/direct",
                Target::Search,
                &[("q", query.to_string()), ("limit", fetch.to_string())],
            )
            .await?;

        Ok(results.into_iter().map(PlaceCandidate::from).collect())
    }
}

/// Temperatures come back in Celsius.
fn metric() -> [(&'static str, String); 1] {
    [("units", "metric".to_string())]
}

fn first_condition(weather: Vec<OwWeather>) -> (String, String) {
    weather
        .into_iter()
        .next()
        .map(|w| (w.description, w.icon))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()))
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn missing_condition_falls_back_to_unknown() {
        assert_eq!(first_condition(Vec::new()).0, "Unknown");
    }

    #[test]
    fn forecast_entry_clamps_precipitation_probability() {
        let entry: OwForecastEntry = serde_json::from_value(serde_json::json!({
            "dt": 1_703_097_600,
            "main": {
                "temp": 17.0, "feels_like": 16.2, "temp_min": 15.0, "temp_max": 19.0,
                "humidity": 75
            },
            "weather": [{ "description": "broken clouds", "icon": "04d" }],
            "wind": { "speed": 3.5 },
            "pop": 1.2
        }))
        .unwrap();

        let sample = entry.into_sample();
        assert_eq!(sample.precipitation_probability, 1.0);
        assert_eq!(sample.condition_icon, "04d");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = OpenWeatherClient::new("KEY", "http://localhost:1234/", Duration::from_secs(1))
            .unwrap();
        assert_eq!(client.base_url, "http://localhost:1234");
    }
}

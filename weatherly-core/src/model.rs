use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Link to the place on a street map, zoomed to neighbourhood level.
    pub fn maps_url(&self) -> String {
        let (lat, lon) = (self.latitude, self.longitude);
        format!("https://www.google.com/maps/@{lat:.4},{lon:.4},15z")
    }
}

/// A place suggested for a partially typed name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    /// ISO 3166 country code, e.g. "GB".
    pub country: String,
    /// State or region, when the source knows one.
    pub region: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl PlaceCandidate {
    /// Identity used to collapse duplicate suggestions.
    pub fn dedup_key(&self) -> (String, String, String) {
        (
            self.name.to_lowercase(),
            self.country.to_lowercase(),
            self.region.as_deref().unwrap_or_default().to_lowercase(),
        )
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// "London, England, GB" style label; also a valid weather query.
    pub fn label(&self) -> String {
        match &self.region {
            Some(region) => format!("{}, {}, {}", self.name, region, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }
}

/// One 3-hour slot of a forecast feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub epoch_seconds: i64,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub min_c: f64,
    pub max_c: f64,
    pub humidity_pct: u8,
    pub condition_icon: String,
    pub description: String,
    /// Probability of precipitation, 0.0..=1.0.
    pub precipitation_probability: f64,
    pub wind_speed: f64,
}

impl WeatherSample {
    /// The sample's instant in the viewer's time zone.
    pub fn local_time<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        DateTime::<Utc>::from_timestamp(self.epoch_seconds, 0).map(|utc| utc.with_timezone(tz))
    }
}

/// The representative sample chosen for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    /// 0 is tomorrow.
    pub day_offset: u32,
    pub date: NaiveDate,
    pub representative_sample: WeatherSample,
}

/// Current conditions at a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub place_name: String,
    pub country: String,
    pub coordinates: Coordinates,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub min_c: f64,
    pub max_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub description: String,
    pub condition_icon: String,
    pub wind_speed_mps: f64,
    pub wind_deg: u16,
    pub visibility_m: Option<u32>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub observation_time: DateTime<Utc>,
    /// Offset of the place's local time from UTC.
    pub utc_offset_seconds: i32,
}

/// URL of the provider's artwork for a condition icon code such as "04d".
pub fn icon_url(icon: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon}@2x.png")
}

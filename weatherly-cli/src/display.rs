//! Plain-text rendering of core results.

use std::fmt::Write;

use chrono::{DateTime, TimeZone, Utc};
use weatherly_core::{
    DashboardView, SearchOutcome, TemperatureUnit, format_temperature,
    dashboard::FeaturedWeather,
};

pub const DEMO_NOTICE: &str = "Demo mode: showing built-in sample data. \
Run `weatherly configure` or set OPENWEATHER_API_KEY for live weather.";

/// Emoji for an OpenWeather icon code such as "10n".
pub fn condition_emoji(icon: &str) -> &'static str {
    match icon {
        "01d" => "☀️",
        "01n" => "🌙",
        "02d" => "⛅",
        "02n" | "03d" | "03n" | "04d" | "04n" => "☁️",
        "09d" | "09n" | "10n" => "🌧️",
        "10d" => "🌦️",
        "11d" | "11n" => "⛈️",
        "13d" | "13n" => "❄️",
        "50d" | "50n" => "🌫️",
        _ => "🌤️",
    }
}

/// Numbered suggestion list; `highlight` marks the keyboard selection.
pub fn suggestions(outcome: &SearchOutcome, highlight: Option<usize>) -> String {
    let places = match outcome {
        SearchOutcome::Failed => return "Search failed. Please try again.\n".to_string(),
        SearchOutcome::Matches(places) if places.is_empty() => {
            return "No matching places.\n".to_string();
        }
        SearchOutcome::Matches(places) => places,
    };

    let mut out = String::new();
    for (i, place) in places.iter().enumerate() {
        let marker = if highlight == Some(i) { '>' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker}{:>2}. {}  ({:.4}, {:.4})",
            i + 1,
            place.label(),
            place.latitude,
            place.longitude
        );
    }
    out
}

fn local_time<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz, fmt: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format(fmt).to_string()
}

pub fn dashboard<Tz: TimeZone>(view: &DashboardView, units: TemperatureUnit, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let s = &view.snapshot;
    let temp = |c: f64| format_temperature(c, units);
    let mut out = String::new();

    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "! {notice}; showing {} instead.\n", s.place_name);
    }

    let _ = writeln!(out, "📍 {}, {}", s.place_name, s.country);
    let observed = local_time(s.observation_time, tz, "%A, %-d %b %Y");
    let _ = writeln!(out, "   {observed}");
    let _ = writeln!(
        out,
        "\n   {} {}  {}",
        condition_emoji(&s.condition_icon),
        temp(s.temperature_c),
        s.description
    );
    let _ = writeln!(out, "   L: {}  H: {}", temp(s.min_c), temp(s.max_c));
    let _ = writeln!(
        out,
        "   Feels like {}  Humidity {}%  Wind {:.1} m/s @ {}°  Pressure {} hPa",
        temp(s.feels_like_c),
        s.humidity_pct,
        s.wind_speed_mps,
        s.wind_deg,
        s.pressure_hpa
    );
    if let Some(vis) = s.visibility_m {
        let _ = writeln!(out, "   Visibility {:.1} km", f64::from(vis) / 1000.0);
    }
    let _ = writeln!(
        out,
        "   Sunrise {}  Sunset {}",
        local_time(s.sunrise, tz, "%H:%M"),
        local_time(s.sunset, tz, "%H:%M")
    );
    let _ = writeln!(out, "   {}", s.coordinates.maps_url());

    if !view.hourly.is_empty() {
        let _ = writeln!(out, "\nNext hours");
        for (i, sample) in view.hourly.iter().enumerate() {
            let label = if i == 0 {
                "Now".to_string()
            } else {
                DateTime::<Utc>::from_timestamp(sample.epoch_seconds, 0)
                    .map(|t| local_time(t, tz, "%H:%M"))
                    .unwrap_or_default()
            };
            let _ = writeln!(
                out,
                "  {:>5}  {} {:>5}  {:>3.0}%",
                label,
                condition_emoji(&sample.condition_icon),
                temp(sample.temperature_c),
                sample.precipitation_probability * 100.0
            );
        }
    }

    if !view.daily.is_empty() {
        let _ = writeln!(out, "\nNext days");
        for bucket in &view.daily {
            let day = if bucket.day_offset == 0 {
                "Tomorrow".to_string()
            } else {
                bucket.date.format("%a %-d").to_string()
            };
            let sample = &bucket.representative_sample;
            let _ = writeln!(
                out,
                "  {:<9} {} {:>5} / {:<5} {}",
                day,
                condition_emoji(&sample.condition_icon),
                temp(sample.max_c),
                temp(sample.min_c),
                sample.description
            );
        }
    }

    out
}

pub fn featured(cities: &[FeaturedWeather], units: TemperatureUnit) -> String {
    let mut out = String::new();
    for entry in cities {
        match &entry.snapshot {
            Some(s) => {
                let _ = writeln!(
                    out,
                    "{:<14} {} {:>5}  {}",
                    entry.city.name,
                    condition_emoji(&s.condition_icon),
                    format_temperature(s.temperature_c, units),
                    s.description
                );
            }
            None => {
                let _ = writeln!(out, "{:<14} unavailable", entry.city.name);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use weatherly_core::{PlaceCandidate, SuggestionCursor};

    #[test]
    fn unknown_icons_get_a_default() {
        assert_eq!(condition_emoji("01d"), "☀️");
        assert_eq!(condition_emoji("10n"), "🌧️");
        assert_eq!(condition_emoji("xyz"), "🌤️");
    }

    fn london() -> PlaceCandidate {
        PlaceCandidate {
            name: "London".into(),
            country: "GB".into(),
            region: Some("England".into()),
            latitude: 51.5074,
            longitude: -0.1278,
        }
    }

    #[test]
    fn suggestions_render_each_outcome() {
        assert!(suggestions(&SearchOutcome::Failed, None).contains("failed"));
        let empty = suggestions(&SearchOutcome::Matches(Vec::new()), None);
        assert!(empty.contains("No matching"));

        let text = suggestions(&SearchOutcome::Matches(vec![london()]), None);
        assert_eq!(text, "  1. London, England, GB  (51.5074, -0.1278)\n");
    }

    #[test]
    fn highlighted_suggestion_is_marked() {
        let mut paris = london();
        paris.name = "Paris".into();
        paris.country = "FR".into();
        paris.region = None;
        let outcome = SearchOutcome::Matches(vec![london(), paris]);

        let mut cursor = SuggestionCursor::new(2);
        cursor.up();
        let text = suggestions(&outcome, cursor.selected());

        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("  1. London"));
        assert!(lines[1].starts_with("> 2. Paris, FR"));
    }
}

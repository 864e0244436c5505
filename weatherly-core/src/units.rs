use serde::{Deserialize, Serialize};

/// Unit system used for every displayed temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    #[serde(alias = "celsius")]
    Metric,
    #[serde(alias = "fahrenheit")]
    Imperial,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Metric => "metric",
            TemperatureUnit::Imperial => "imperial",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Metric => "°C",
            TemperatureUnit::Imperial => "°F",
        }
    }

    /// The other unit, for a C/F switch.
    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::Metric => TemperatureUnit::Imperial,
            TemperatureUnit::Imperial => TemperatureUnit::Metric,
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" | "celsius" | "c" => Ok(TemperatureUnit::Metric),
            "imperial" | "fahrenheit" | "f" => Ok(TemperatureUnit::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: metric, imperial."
            )),
        }
    }
}

/// Convert a Celsius reading for display.
///
/// Metric values pass through untouched. Imperial values are converted and
/// rounded half away from zero, so current/min/max stay mutually consistent.
pub fn to_display_unit(celsius: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Metric => celsius,
        TemperatureUnit::Imperial => (celsius * 9.0 / 5.0 + 32.0).round(),
    }
}

/// "17°C" / "63°F".
pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    let value = to_display_unit(celsius, unit).round();
    // avoid printing "-0"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}{}", unit.symbol())
}

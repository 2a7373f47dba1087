//! Forecast variables offered by the dashboard controls

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DashboardError;

/// Hourly forecast variables, named exactly as the forecast service expects them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HourlyVariable {
    #[serde(rename = "temperature_2m")]
    Temperature2m,
    #[serde(rename = "apparent_temperature")]
    ApparentTemperature,
    #[serde(rename = "relativehumidity_2m")]
    RelativeHumidity2m,
    #[serde(rename = "precipitation")]
    Precipitation,
    #[serde(rename = "windspeed_10m")]
    WindSpeed10m,
    #[serde(rename = "winddirection_10m")]
    WindDirection10m,
    #[serde(rename = "weathercode")]
    WeatherCode,
}

impl HourlyVariable {
    pub const ALL: [HourlyVariable; 7] = [
        Self::Temperature2m,
        Self::ApparentTemperature,
        Self::RelativeHumidity2m,
        Self::Precipitation,
        Self::WindSpeed10m,
        Self::WindDirection10m,
        Self::WeatherCode,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Temperature2m => "temperature_2m",
            Self::ApparentTemperature => "apparent_temperature",
            Self::RelativeHumidity2m => "relativehumidity_2m",
            Self::Precipitation => "precipitation",
            Self::WindSpeed10m => "windspeed_10m",
            Self::WindDirection10m => "winddirection_10m",
            Self::WeatherCode => "weathercode",
        }
    }
}

/// Daily forecast variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DailyVariable {
    #[serde(rename = "temperature_2m_max")]
    Temperature2mMax,
    #[serde(rename = "temperature_2m_min")]
    Temperature2mMin,
    #[serde(rename = "precipitation_sum")]
    PrecipitationSum,
    #[serde(rename = "weathercode")]
    WeatherCode,
}

impl DailyVariable {
    pub const ALL: [DailyVariable; 4] = [
        Self::Temperature2mMax,
        Self::Temperature2mMin,
        Self::PrecipitationSum,
        Self::WeatherCode,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Temperature2mMax => "temperature_2m_max",
            Self::Temperature2mMin => "temperature_2m_min",
            Self::PrecipitationSum => "precipitation_sum",
            Self::WeatherCode => "weathercode",
        }
    }
}

impl FromStr for HourlyVariable {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| DashboardError::validation(format!("Unknown hourly variable '{s}'")))
    }
}

impl FromStr for DailyVariable {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| DashboardError::validation(format!("Unknown daily variable '{s}'")))
    }
}

impl fmt::Display for HourlyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DailyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a comma-joined variable list such as `temperature_2m,precipitation`.
///
/// Blank segments are ignored, so an empty string yields an empty list.
pub fn parse_list<T: FromStr<Err = DashboardError>>(input: &str) -> Result<Vec<T>, DashboardError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// Remove repeated entries, keeping the first occurrence of each
pub fn dedup_ordered<T: PartialEq + Copy>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(*item);
        }
    }
    out
}

/// Join variable names with commas, the way the forecast service expects them
pub fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

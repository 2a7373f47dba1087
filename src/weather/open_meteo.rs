//! `OpenMeteo` API response structures and conversion utilities

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::models::{
    Column, CurrentConditions, ForecastDocument, ForecastQuery, PlaceCandidate, TimeSeries,
};
use crate::{DashboardError, Result};

/// Geocoding response from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    /// Absent when nothing matched
    pub results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    pub admin1: Option<String>,
    pub timezone: Option<String>,
}

impl From<GeocodingResult> for PlaceCandidate {
    fn from(result: GeocodingResult) -> Self {
        PlaceCandidate::new(
            result.name,
            result.country,
            result.admin1,
            result.latitude,
            result.longitude,
            result.timezone,
        )
    }
}

/// The `current_weather` block of a forecast response
#[derive(Debug, Deserialize)]
struct CurrentWeatherData {
    temperature: f64,
    windspeed: f64,
    winddirection: f64,
    weathercode: Option<u8>,
    time: String,
}

/// Parse a service timestamp: `2024-05-01T13:00`, with optional seconds, or a bare date.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN)))
        .map_err(|_| DashboardError::decode(format!("Invalid timestamp '{value}'")))
}

/// Build a [`ForecastDocument`] from a raw forecast response.
///
/// Only variables named in `query` become columns; anything else the
/// service sent stays available through `raw` alone.
pub fn parse_forecast(raw: Value, query: &ForecastQuery) -> Result<ForecastDocument> {
    let current = parse_current(raw.get("current_weather"))?;

    let hourly_names: Vec<&str> = query.hourly.iter().map(|v| v.as_str()).collect();
    let hourly = parse_series("hourly", &raw, &hourly_names)?;

    let daily_names: Vec<&str> = query.daily.iter().map(|v| v.as_str()).collect();
    let daily = parse_series("daily", &raw, &daily_names)?;

    Ok(ForecastDocument {
        current,
        hourly,
        daily,
        raw,
    })
}

fn parse_current(block: Option<&Value>) -> Result<Option<CurrentConditions>> {
    let Some(block) = block.filter(|b| b.as_object().is_some_and(|o| !o.is_empty())) else {
        return Ok(None);
    };

    let data: CurrentWeatherData = serde_json::from_value(block.clone())
        .map_err(|e| DashboardError::decode(format!("Invalid current_weather block: {e}")))?;

    Ok(Some(CurrentConditions {
        temperature: data.temperature,
        wind_speed: data.windspeed,
        wind_direction: data.winddirection,
        observed_at: parse_timestamp(&data.time)?,
        weather_code: data.weathercode,
    }))
}

/// Reshape a block of parallel arrays (`{"time": [...], "var": [...]}`) into a series.
fn parse_series(block_name: &str, raw: &Value, requested: &[&str]) -> Result<Option<TimeSeries>> {
    let Some(block) = raw.get(block_name).and_then(Value::as_object) else {
        return Ok(None);
    };
    let units = raw
        .get(format!("{block_name}_units"))
        .and_then(Value::as_object);

    let time = block
        .get("time")
        .and_then(Value::as_array)
        .ok_or_else(|| DashboardError::decode(format!("{block_name} block has no time column")))?
        .iter()
        .map(|t| {
            t.as_str()
                .ok_or_else(|| DashboardError::decode(format!("Non-string time in {block_name}")))
                .and_then(parse_timestamp)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut columns = Vec::with_capacity(requested.len());
    for name in requested {
        let Some(values) = block.get(*name).and_then(Value::as_array) else {
            debug!("Requested {} variable '{}' missing from response", block_name, name);
            continue;
        };
        columns.push(Column {
            name: (*name).to_string(),
            unit: units
                .and_then(|u| u.get(*name))
                .and_then(Value::as_str)
                .map(str::to_string),
            values: values.iter().map(Value::as_f64).collect(),
        });
    }

    Ok(Some(TimeSeries { time, columns }))
}

/// Convert `OpenMeteo` weather code to human-readable description
#[must_use]
pub fn weather_code_to_description(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

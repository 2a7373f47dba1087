//! Forecast request and response models

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::variables::{self, DailyVariable, HourlyVariable};
use crate::{DashboardError, Result};

/// Upper bound accepted by the forecast service for `forecast_days`
pub const MAX_FORECAST_DAYS: u8 = 16;

/// Timezone value asking the forecast service to pick the local zone itself
pub const AUTO_TIMEZONE: &str = "auto";

/// Parameters of one forecast request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub hourly: Vec<HourlyVariable>,
    pub daily: Vec<DailyVariable>,
    pub forecast_days: u8,
}

impl ForecastQuery {
    /// Build a validated query. Variable lists are deduplicated, keeping order.
    pub fn new(
        latitude: f64,
        longitude: f64,
        timezone: impl Into<String>,
        hourly: &[HourlyVariable],
        daily: &[DailyVariable],
        forecast_days: u8,
    ) -> Result<Self> {
        let query = Self {
            latitude,
            longitude,
            timezone: timezone.into().trim().to_string(),
            hourly: variables::dedup_ordered(hourly),
            daily: variables::dedup_ordered(daily),
            forecast_days,
        };
        query.validate()?;
        Ok(query)
    }

    /// Check coordinate ranges, day count and timezone identifier
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(DashboardError::validation(format!(
                "Latitude must be between -90 and 90, got: {}",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(DashboardError::validation(format!(
                "Longitude must be between -180 and 180, got: {}",
                self.longitude
            )));
        }
        if !(1..=MAX_FORECAST_DAYS).contains(&self.forecast_days) {
            return Err(DashboardError::validation(format!(
                "Forecast days must be between 1 and {MAX_FORECAST_DAYS}, got: {}",
                self.forecast_days
            )));
        }
        if self.timezone != AUTO_TIMEZONE && self.timezone.parse::<Tz>().is_err() {
            return Err(DashboardError::validation(format!(
                "Unknown timezone '{}'",
                self.timezone
            )));
        }
        Ok(())
    }

    /// Cache key covering the full parameter tuple
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "forecast:{}:{}:{}:{}:{}:{}",
            self.latitude,
            self.longitude,
            self.timezone,
            variables::join(&self.hourly),
            variables::join(&self.daily),
            self.forecast_days
        )
    }
}

/// Conditions reported in the `current_weather` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in °C
    pub temperature: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Wind direction in degrees
    pub wind_direction: f64,
    /// Observation time, local to the requested timezone
    pub observed_at: NaiveDateTime,
    /// WMO weather code
    pub weather_code: Option<u8>,
}

/// One measurement column of a time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub unit: Option<String>,
    /// One value per timestamp; `None` where the service reported null
    pub values: Vec<Option<f64>>,
}

/// Timestamped rows sharing a `time` column
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    pub time: Vec<NaiveDateTime>,
    pub columns: Vec<Column>,
}

impl TimeSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Parsed forecast response plus the raw body it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDocument {
    pub current: Option<CurrentConditions>,
    pub hourly: Option<TimeSeries>,
    pub daily: Option<TimeSeries>,
    pub raw: serde_json::Value,
}

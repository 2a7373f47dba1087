//! Place candidates returned by geocoding

use serde::{Deserialize, Serialize};

/// Timezone used when the geocoder does not report one
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// One geocoding match
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlaceCandidate {
    /// Label shown in the selection list, e.g. "Seoul, South Korea (Seoul)"
    pub display_name: String,
    /// Place name as reported by the geocoder
    pub name: String,
    /// Country name
    pub country: Option<String>,
    /// First-level administrative region (state, province, ...)
    pub admin1: Option<String>,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// IANA timezone identifier
    pub timezone: Option<String>,
}

impl PlaceCandidate {
    /// Create a candidate and derive its display name
    #[must_use]
    pub fn new(
        name: String,
        country: Option<String>,
        admin1: Option<String>,
        latitude: f64,
        longitude: f64,
        timezone: Option<String>,
    ) -> Self {
        let display_name = Self::format_display_name(&name, country.as_deref(), admin1.as_deref());
        Self {
            display_name,
            name,
            country,
            admin1,
            latitude,
            longitude,
            timezone,
        }
    }

    /// `"{name}, {country} ({admin1})"`, with missing parts left blank
    #[must_use]
    pub fn format_display_name(name: &str, country: Option<&str>, admin1: Option<&str>) -> String {
        format!(
            "{}, {} ({})",
            name,
            country.unwrap_or_default(),
            admin1.unwrap_or_default()
        )
    }

    /// Timezone to request forecasts in
    #[must_use]
    pub fn timezone_or_default(&self) -> &str {
        self.timezone
            .as_deref()
            .filter(|tz| !tz.trim().is_empty())
            .unwrap_or(DEFAULT_TIMEZONE)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

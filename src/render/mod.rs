//! Forecast rendering
//!
//! Reshapes a [`ForecastDocument`] into the four dashboard sections. Each
//! section is built on its own, so a missing block only blanks its section.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::models::{
    Column, DailyVariable, ForecastDocument, ForecastQuery, HourlyVariable, TimeSeries,
};
use crate::weather::open_meteo::weather_code_to_description;

pub mod chart;
pub mod html;

/// Zoom level of the location map
pub const MAP_ZOOM: u8 = 10;

/// Everything the page shows for one forecast
#[derive(Debug, Clone, Serialize)]
pub struct ForecastView {
    pub current: CurrentSummary,
    pub hourly_charts: Vec<LineChart>,
    pub daily_table: Option<DailyTable>,
    pub marker: MapMarker,
    /// Pretty-printed service response
    pub raw_json: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CurrentSummary {
    Present {
        temperature: f64,
        wind_speed: f64,
        wind_direction: f64,
        observed_at: String,
        description: Option<&'static str>,
    },
    /// Shown as an explicit "no current data" notice
    Missing,
}

/// One hourly variable over time; `None` values are gaps in the line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub variable: String,
    pub unit: Option<String>,
    pub points: Vec<(NaiveDateTime, Option<f64>)>,
}

impl LineChart {
    /// Smallest and largest present value
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|(_, v)| *v)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Daily summary, already formatted for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

impl MapMarker {
    /// Bounding box `(west, south, east, north)` roughly matching the zoom level
    #[must_use]
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        let half = 180.0 / 2_f64.powi(i32::from(self.zoom));
        (
            (self.longitude - half).max(-180.0),
            (self.latitude - half).max(-90.0),
            (self.longitude + half).min(180.0),
            (self.latitude + half).min(90.0),
        )
    }

    /// OpenStreetMap embed URL with a pin on the location
    #[must_use]
    pub fn embed_url(&self) -> String {
        let (west, south, east, north) = self.bbox();
        format!(
            "https://www.openstreetmap.org/export/embed.html?bbox={west:.4},{south:.4},{east:.4},{north:.4}&layer=mapnik&marker={:.4},{:.4}",
            self.latitude, self.longitude
        )
    }
}

/// Build every section for `document`, fetched with `query`
#[must_use]
pub fn render_forecast(document: &ForecastDocument, query: &ForecastQuery) -> ForecastView {
    ForecastView {
        current: current_summary(document),
        hourly_charts: hourly_charts(document, &query.hourly),
        daily_table: daily_table(document, &query.daily),
        marker: location_marker(query.latitude, query.longitude),
        raw_json: serde_json::to_string_pretty(&document.raw).unwrap_or_default(),
    }
}

#[must_use]
pub fn current_summary(document: &ForecastDocument) -> CurrentSummary {
    match &document.current {
        Some(current) => CurrentSummary::Present {
            temperature: current.temperature,
            wind_speed: current.wind_speed,
            wind_direction: current.wind_direction,
            observed_at: current.observed_at.format("%Y-%m-%d %H:%M").to_string(),
            description: current.weather_code.map(weather_code_to_description),
        },
        None => CurrentSummary::Missing,
    }
}

/// One chart per selected variable present in the hourly series, in selection order
#[must_use]
pub fn hourly_charts(document: &ForecastDocument, selected: &[HourlyVariable]) -> Vec<LineChart> {
    let Some(series) = &document.hourly else {
        return Vec::new();
    };

    selected
        .iter()
        .filter_map(|variable| {
            let column = series.column(variable.as_str());
            if column.is_none() {
                debug!("Skipping chart for missing hourly variable '{}'", variable);
            }
            column
        })
        .map(|column| LineChart {
            variable: column.name.clone(),
            unit: column.unit.clone(),
            points: series
                .time
                .iter()
                .enumerate()
                .map(|(i, t)| (*t, column.values.get(i).copied().flatten()))
                .collect(),
        })
        .collect()
}

/// Time column plus each selected daily variable present, rows in service order.
///
/// `None` when the response has no daily block or nothing was selected.
#[must_use]
pub fn daily_table(document: &ForecastDocument, selected: &[DailyVariable]) -> Option<DailyTable> {
    let series = document.daily.as_ref()?;
    if selected.is_empty() {
        return None;
    }

    let columns: Vec<&Column> = selected
        .iter()
        .filter_map(|variable| series.column(variable.as_str()))
        .collect();

    let mut headers = vec!["time".to_string()];
    headers.extend(columns.iter().map(|c| match &c.unit {
        Some(unit) => format!("{} ({unit})", c.name),
        None => c.name.clone(),
    }));

    Some(DailyTable {
        headers,
        rows: daily_rows(series, &columns),
    })
}

fn daily_rows(series: &TimeSeries, columns: &[&Column]) -> Vec<Vec<String>> {
    series
        .time
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let mut row = vec![day.format("%Y-%m-%d").to_string()];
            row.extend(columns.iter().map(|c| {
                format_cell(&c.name, c.values.get(i).copied().flatten())
            }));
            row
        })
        .collect()
}

fn format_cell(variable: &str, value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(code) if variable == DailyVariable::WeatherCode.as_str() => {
            format!("{code} ({})", weather_code_to_description(code as u8))
        }
        Some(v) => v.to_string(),
    }
}

#[must_use]
pub fn location_marker(latitude: f64, longitude: f64) -> MapMarker {
    MapMarker {
        latitude,
        longitude,
        zoom: MAP_ZOOM,
    }
}

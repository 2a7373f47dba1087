//! Data models for the MeteoDash application
//!
//! This module contains the core domain models organized by concern:
//! - Location: place candidates produced by geocoding
//! - Forecast: forecast queries, documents and time series
//! - Variables: the hourly and daily variables a user can request

pub mod forecast;
pub mod location;
pub mod variables;

// Re-export all public types for convenient access
pub use forecast::{
    Column, CurrentConditions, ForecastDocument, ForecastQuery, MAX_FORECAST_DAYS, TimeSeries,
};
pub use location::{DEFAULT_TIMEZONE, PlaceCandidate};
pub use variables::{DailyVariable, HourlyVariable};

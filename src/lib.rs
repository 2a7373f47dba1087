//! `MeteoDash` - Interactive weather dashboard backed by `OpenMeteo`
//!
//! This library provides place search, forecast retrieval, and the
//! server-rendered dashboard that charts and maps the results.

pub mod api;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod models;
pub mod render;
pub mod selection;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use cache::TtlCache;
pub use config::MeteoDashConfig;
pub use dashboard::{Dashboard, DashboardRequest, DashboardState};
pub use error::DashboardError;
pub use models::{ForecastDocument, ForecastQuery, PlaceCandidate};
pub use selection::{ResolvedPlace, SelectionResolver};
pub use weather::{ForecastClient, GeocodeClient, OpenMeteo, WeatherService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

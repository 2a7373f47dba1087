//! Weather API clients for `OpenMeteo` integration
//!
//! Geocoding and forecast retrieval share one HTTP client; each keeps its
//! own time-to-live memo of successful responses.

use async_trait::async_trait;

use crate::Result;
use crate::config::MeteoDashConfig;
use crate::models::{ForecastDocument, ForecastQuery, PlaceCandidate};

pub mod forecast;
pub mod geocode;
pub mod http;
pub mod open_meteo;

pub use forecast::ForecastClient;
pub use geocode::GeocodeClient;

/// The two remote reads the dashboard pipeline depends on
#[async_trait]
pub trait WeatherService: Send + Sync {
    /// Resolve a free-text place name to at most `limit` candidates
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<PlaceCandidate>>;

    /// Retrieve the forecast described by `query`
    async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastDocument>;
}

/// `OpenMeteo`-backed [`WeatherService`]
pub struct OpenMeteo {
    geocoder: GeocodeClient,
    forecaster: ForecastClient,
}

impl OpenMeteo {
    pub fn new(config: &MeteoDashConfig) -> Result<Self> {
        let client = http::build_client(&config.http)?;
        Ok(Self {
            geocoder: GeocodeClient::new(client.clone(), &config.geocoding),
            forecaster: ForecastClient::new(client, &config.forecast),
        })
    }
}

#[async_trait]
impl WeatherService for OpenMeteo {
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<PlaceCandidate>> {
        self.geocoder.search(query, limit).await
    }

    async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastDocument> {
        self.forecaster.fetch(query).await
    }
}

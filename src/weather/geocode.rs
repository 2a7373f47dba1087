//! Place search against the `OpenMeteo` geocoding API

use std::time::{Duration, Instant};

use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, info, instrument, warn};

use super::http;
use super::open_meteo::GeocodingResponse;
use crate::cache::TtlCache;
use crate::config::EndpointConfig;
use crate::models::PlaceCandidate;
use crate::{DashboardError, Result};

/// Largest result count a user may ask for
pub const MAX_RESULTS: u8 = 10;

/// Geocoding client with a time-boxed memo of previous searches
pub struct GeocodeClient {
    http: ClientWithMiddleware,
    base_url: String,
    timeout: Duration,
    cache: TtlCache<String, Vec<PlaceCandidate>>,
}

impl GeocodeClient {
    pub fn new(http: ClientWithMiddleware, config: &EndpointConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            cache: TtlCache::new(config.cache_ttl()),
        }
    }

    /// Search for places matching `query`, returning at most `limit` candidates.
    ///
    /// An empty list is a valid answer. Blank queries and limits outside
    /// `1..=10` are rejected before any request is made.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, limit: u8) -> Result<Vec<PlaceCandidate>> {
        let query = validate_query(query)?;
        validate_limit(limit)?;

        let key = format!("geocode:{query}:{limit}");
        self.cache
            .get_or_try_fetch(key, || self.search_call(query, limit))
            .await
    }

    async fn search_call(&self, query: &str, limit: u8) -> Result<Vec<PlaceCandidate>> {
        info!("Geocoding location: '{}'", query);
        let start_time = Instant::now();

        let url = format!(
            "{}/search?name={}&count={}&language=en&format=json",
            self.base_url,
            urlencoding::encode(query),
            limit
        );
        debug!("Geocoding request URL: {}", url);

        let response: GeocodingResponse = http::get_json(&self.http, &url, self.timeout).await?;

        let mut candidates: Vec<PlaceCandidate> = response
            .results
            .unwrap_or_default()
            .into_iter()
            .map(PlaceCandidate::from)
            .collect();
        candidates.truncate(usize::from(limit));

        if candidates.is_empty() {
            warn!("No results found for location '{}'", query);
        } else {
            info!(
                "Found {} geocoding results for '{}' in {:.3}s",
                candidates.len(),
                query,
                start_time.elapsed().as_secs_f64()
            );
        }

        Ok(candidates)
    }
}

/// Trim the query and reject it when nothing is left
pub fn validate_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::validation("Location cannot be empty"));
    }
    Ok(trimmed)
}

pub fn validate_limit(limit: u8) -> Result<()> {
    if !(1..=MAX_RESULTS).contains(&limit) {
        return Err(DashboardError::validation(format!(
            "Result count must be between 1 and {MAX_RESULTS}, got: {limit}"
        )));
    }
    Ok(())
}

//! Forecast retrieval against the `OpenMeteo` forecast API

use std::time::{Duration, Instant};

use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::http;
use super::open_meteo;
use crate::Result;
use crate::cache::TtlCache;
use crate::config::EndpointConfig;
use crate::models::variables;
use crate::models::{ForecastDocument, ForecastQuery};

/// Forecast client with a short-lived memo keyed by the full query
pub struct ForecastClient {
    http: ClientWithMiddleware,
    base_url: String,
    timeout: Duration,
    cache: TtlCache<String, ForecastDocument>,
}

impl ForecastClient {
    pub fn new(http: ClientWithMiddleware, config: &EndpointConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            cache: TtlCache::new(config.cache_ttl()),
        }
    }

    /// Fetch current conditions plus the requested hourly and daily series.
    #[instrument(skip(self, query), fields(lat = query.latitude, lon = query.longitude, days = query.forecast_days))]
    pub async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastDocument> {
        query.validate()?;
        self.cache
            .get_or_try_fetch(query.cache_key(), || self.fetch_call(query))
            .await
    }

    async fn fetch_call(&self, query: &ForecastQuery) -> Result<ForecastDocument> {
        info!(
            "Getting {}-day forecast for coordinates: {:.4}, {:.4}",
            query.forecast_days, query.latitude, query.longitude
        );
        let start_time = Instant::now();

        let url = self.request_url(query);
        debug!("Forecast request URL: {}", url);

        let raw: Value = http::get_json(&self.http, &url, self.timeout).await?;
        let document = open_meteo::parse_forecast(raw, query)?;

        info!(
            "Retrieved forecast with {} hourly and {} daily rows in {:.3}s",
            document.hourly.as_ref().map_or(0, |s| s.len()),
            document.daily.as_ref().map_or(0, |s| s.len()),
            start_time.elapsed().as_secs_f64()
        );
        Ok(document)
    }

    /// Build the request URL. Empty variable sets omit their parameter entirely.
    #[must_use]
    pub fn request_url(&self, query: &ForecastQuery) -> String {
        let mut url = format!(
            "{}/forecast?latitude={}&longitude={}",
            self.base_url, query.latitude, query.longitude
        );
        if !query.hourly.is_empty() {
            url.push_str("&hourly=");
            url.push_str(&variables::join(&query.hourly));
        }
        if !query.daily.is_empty() {
            url.push_str("&daily=");
            url.push_str(&variables::join(&query.daily));
        }
        url.push_str(&format!(
            "&current_weather=true&forecast_days={}&timezone={}",
            query.forecast_days,
            urlencoding::encode(&query.timezone)
        ));
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use crate::models::{DailyVariable, HourlyVariable};

    fn client() -> ForecastClient {
        let config = EndpointConfig {
            base_url: "https://api.example.test/v1/".to_string(),
            ..EndpointConfig::forecast()
        };
        ForecastClient::new(http::build_client(&HttpConfig::default()).unwrap(), &config)
    }

    #[test]
    fn test_request_url_with_all_parameters() {
        let query = ForecastQuery::new(
            37.566,
            126.9784,
            "Asia/Seoul",
            &[HourlyVariable::Temperature2m, HourlyVariable::Precipitation],
            &[DailyVariable::Temperature2mMax],
            7,
        )
        .unwrap();

        assert_eq!(
            client().request_url(&query),
            "https://api.example.test/v1/forecast?latitude=37.566&longitude=126.9784\
             &hourly=temperature_2m,precipitation&daily=temperature_2m_max\
             &current_weather=true&forecast_days=7&timezone=Asia%2FSeoul"
        );
    }

    #[test]
    fn test_request_url_omits_empty_variable_sets() {
        let query = ForecastQuery::new(0.0, 0.0, "UTC", &[], &[], 1).unwrap();
        let url = client().request_url(&query);

        assert!(!url.contains("hourly"));
        assert!(!url.contains("daily"));
        assert!(url.contains("current_weather=true"));
        assert!(url.ends_with("forecast_days=1&timezone=UTC"));
    }
}

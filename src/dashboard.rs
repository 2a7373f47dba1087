//! Dashboard pipeline
//!
//! One user action runs geocode → select → fetch → render and lands in a
//! [`DashboardState`]. Nothing carries over between runs except the client
//! caches behind the [`WeatherService`].

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use crate::config::DefaultsConfig;
use crate::models::variables;
use crate::models::{DailyVariable, ForecastQuery, HourlyVariable, MAX_FORECAST_DAYS, PlaceCandidate};
use crate::render::{self, ForecastView};
use crate::selection::{ResolvedPlace, SelectionResolver};
use crate::weather::WeatherService;
use crate::weather::geocode;
use crate::{DashboardError, Result};

/// The user's inputs for one run
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRequest {
    pub query: String,
    pub max_results: u8,
    pub forecast_days: u8,
    pub hourly: Vec<HourlyVariable>,
    pub daily: Vec<DailyVariable>,
    /// Candidate index; `None` picks the first
    pub selection: Option<usize>,
    /// Set only by an explicit search action
    pub submitted: bool,
}

impl DashboardRequest {
    /// Initial form state, nothing submitted yet
    #[must_use]
    pub fn from_defaults(defaults: &DefaultsConfig) -> Self {
        Self {
            query: defaults.query.clone(),
            max_results: defaults.max_results,
            forecast_days: defaults.forecast_days,
            hourly: defaults.hourly.clone(),
            daily: defaults.daily.clone(),
            selection: None,
            submitted: false,
        }
    }

    /// Read the request from the page's query string.
    ///
    /// Once the form has been submitted (`q` present) the variable lists are
    /// taken as given, so unchecking everything yields an empty set rather
    /// than the defaults.
    pub fn from_query_string(raw: Option<&str>, defaults: &DefaultsConfig) -> Result<Self> {
        let mut request = Self::from_defaults(defaults);
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return Ok(request);
        };

        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(raw.as_bytes())
            .into_owned()
            .collect();

        if pairs.iter().any(|(k, _)| k == "q") {
            request.hourly.clear();
            request.daily.clear();
        }

        for (key, value) in pairs {
            match key.as_str() {
                "q" => request.query = value,
                "count" => request.max_results = parse_number(&key, &value)?,
                "days" => request.forecast_days = parse_number(&key, &value)?,
                "hourly" => request.hourly.push(value.parse()?),
                "daily" => request.daily.push(value.parse()?),
                "place" => request.selection = Some(parse_number(&key, &value)?),
                "search" => request.submitted = true,
                _ => {}
            }
        }

        request.hourly = variables::dedup_ordered(&request.hourly);
        request.daily = variables::dedup_ordered(&request.daily);
        Ok(request)
    }

    /// Bounds checks that must pass before any network call
    pub fn validate(&self) -> Result<()> {
        geocode::validate_limit(self.max_results)?;
        if !(1..=MAX_FORECAST_DAYS).contains(&self.forecast_days) {
            return Err(DashboardError::validation(format!(
                "Forecast days must be between 1 and {MAX_FORECAST_DAYS}, got: {}",
                self.forecast_days
            )));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DashboardError::validation(format!("Invalid value for '{key}': {value}")))
}

/// Where a run ended up
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DashboardState {
    /// No trigger yet, or a blank query
    AwaitingQuery,
    /// The place search came back empty; no forecast was requested
    NoResults { query: String },
    ShowingResults(Box<DashboardResults>),
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResults {
    pub candidates: Vec<PlaceCandidate>,
    pub place: ResolvedPlace,
    pub forecast: ForecastView,
}

/// Runs the pipeline against a [`WeatherService`]
#[derive(Clone)]
pub struct Dashboard {
    service: Arc<dyn WeatherService>,
}

impl Dashboard {
    pub fn new(service: Arc<dyn WeatherService>) -> Self {
        Self { service }
    }

    #[instrument(skip(self, request), fields(query = %request.query, submitted = request.submitted))]
    pub async fn run(&self, request: &DashboardRequest) -> Result<DashboardState> {
        let query = request.query.trim();
        if !request.submitted || query.is_empty() {
            return Ok(DashboardState::AwaitingQuery);
        }
        request.validate()?;

        let candidates = self.service.search(query, request.max_results).await?;
        if candidates.is_empty() {
            info!("No places found for '{}'", query);
            return Ok(DashboardState::NoResults {
                query: query.to_string(),
            });
        }

        let place = SelectionResolver::resolve(&candidates, request.selection)?;
        let forecast_query = ForecastQuery::new(
            place.latitude,
            place.longitude,
            &place.timezone,
            &request.hourly,
            &request.daily,
            request.forecast_days,
        )?;
        let document = self.service.fetch(&forecast_query).await?;
        let forecast = render::render_forecast(&document, &forecast_query);

        info!(
            "Rendered forecast for {} with {} charts",
            place.display_name,
            forecast.hourly_charts.len()
        );
        Ok(DashboardState::ShowingResults(Box::new(DashboardResults {
            candidates,
            place,
            forecast,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastDocument, TimeSeries};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeService {
        candidates: Vec<PlaceCandidate>,
        searches: AtomicUsize,
        fetches: AtomicUsize,
        last_query: Mutex<Option<ForecastQuery>>,
    }

    impl FakeService {
        fn with(candidates: Vec<PlaceCandidate>) -> Arc<Self> {
            Arc::new(Self {
                candidates,
                ..Self::default()
            })
        }
    }

    #[async_trait]
    impl WeatherService for FakeService {
        async fn search(&self, _query: &str, limit: u8) -> Result<Vec<PlaceCandidate>> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .candidates
                .iter()
                .take(usize::from(limit))
                .cloned()
                .collect())
        }

        async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastDocument> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(query.clone());
            let midnight = NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap();
            Ok(ForecastDocument {
                current: None,
                hourly: Some(TimeSeries {
                    time: vec![midnight],
                    columns: Vec::new(),
                }),
                daily: None,
                raw: json!({}),
            })
        }
    }

    fn seoul() -> PlaceCandidate {
        PlaceCandidate::new(
            "Seoul".to_string(),
            Some("South Korea".to_string()),
            Some("Seoul".to_string()),
            37.566,
            126.9784,
            Some("Asia/Seoul".to_string()),
        )
    }

    fn busan() -> PlaceCandidate {
        PlaceCandidate::new(
            "Busan".to_string(),
            Some("South Korea".to_string()),
            None,
            35.1028,
            129.0403,
            None,
        )
    }

    fn submitted(query: &str) -> DashboardRequest {
        DashboardRequest {
            submitted: true,
            query: query.to_string(),
            ..DashboardRequest::from_defaults(&DefaultsConfig::default())
        }
    }

    #[tokio::test]
    async fn test_no_trigger_awaits_query() {
        let service = FakeService::with(vec![seoul()]);
        let dashboard = Dashboard::new(service.clone());

        let request = DashboardRequest::from_defaults(&DefaultsConfig::default());
        let state = dashboard.run(&request).await.unwrap();

        assert!(matches!(state, DashboardState::AwaitingQuery));
        assert_eq!(service.searches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_query_never_searches() {
        let service = FakeService::with(vec![seoul()]);
        let dashboard = Dashboard::new(service.clone());

        let state = dashboard.run(&submitted("   ")).await.unwrap();

        assert!(matches!(state, DashboardState::AwaitingQuery));
        assert_eq!(service.searches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_results_never_fetch() {
        let service = FakeService::with(Vec::new());
        let dashboard = Dashboard::new(service.clone());

        let state = dashboard.run(&submitted(" Atlantis ")).await.unwrap();

        match state {
            DashboardState::NoResults { query } => assert_eq!(query, "Atlantis"),
            other => panic!("unexpected state: {other:?}"),
        }
        assert_eq!(service.searches.load(Ordering::SeqCst), 1);
        assert_eq!(service.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_selected_index_drives_forecast_query() {
        let service = FakeService::with(vec![seoul(), busan()]);
        let dashboard = Dashboard::new(service.clone());

        let request = DashboardRequest {
            selection: Some(1),
            forecast_days: 3,
            ..submitted("Korea")
        };
        let state = dashboard.run(&request).await.unwrap();

        let DashboardState::ShowingResults(results) = state else {
            panic!("expected results");
        };
        assert_eq!(results.candidates.len(), 2);
        assert_eq!(results.place.index, 1);

        let query = service.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.latitude, 35.1028);
        assert_eq!(query.timezone, "UTC");
        assert_eq!(query.forecast_days, 3);
    }

    #[tokio::test]
    async fn test_missing_hourly_variable_yields_zero_charts() {
        let service = FakeService::with(vec![seoul()]);
        let dashboard = Dashboard::new(service);

        let request = DashboardRequest {
            hourly: vec![HourlyVariable::WeatherCode],
            ..submitted("Seoul")
        };
        let DashboardState::ShowingResults(results) = dashboard.run(&request).await.unwrap() else {
            panic!("expected results");
        };
        assert!(results.forecast.hourly_charts.is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_values_rejected_before_search() {
        let service = FakeService::with(vec![seoul()]);
        let dashboard = Dashboard::new(service.clone());

        let request = DashboardRequest {
            forecast_days: 17,
            ..submitted("Seoul")
        };
        let err = dashboard.run(&request).await.unwrap_err();

        assert!(matches!(err, DashboardError::Validation { .. }));
        assert_eq!(service.searches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_query_string_without_form_keeps_defaults() {
        let defaults = DefaultsConfig::default();
        let request = DashboardRequest::from_query_string(None, &defaults).unwrap();
        assert_eq!(request, DashboardRequest::from_defaults(&defaults));
        assert!(!request.submitted);
    }

    #[test]
    fn test_query_string_with_form_fields() {
        let request = DashboardRequest::from_query_string(
            Some("q=New+York&count=3&days=5&hourly=windspeed_10m&hourly=temperature_2m&hourly=windspeed_10m&place=2&search=1"),
            &DefaultsConfig::default(),
        )
        .unwrap();

        assert_eq!(request.query, "New York");
        assert_eq!(request.max_results, 3);
        assert_eq!(request.forecast_days, 5);
        assert_eq!(
            request.hourly,
            vec![HourlyVariable::WindSpeed10m, HourlyVariable::Temperature2m]
        );
        assert!(request.daily.is_empty());
        assert_eq!(request.selection, Some(2));
        assert!(request.submitted);
    }

    #[test]
    fn test_query_string_rejects_bad_values() {
        let defaults = DefaultsConfig::default();
        assert!(DashboardRequest::from_query_string(Some("q=x&count=many"), &defaults).is_err());
        assert!(DashboardRequest::from_query_string(Some("q=x&hourly=snowfall"), &defaults).is_err());
    }
}

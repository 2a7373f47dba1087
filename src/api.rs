//! JSON API mounted under `/api`

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{
    DEFAULT_TIMEZONE, DailyVariable, ForecastDocument, ForecastQuery, HourlyVariable, PlaceCandidate,
    variables,
};
use crate::web::AppState;
use crate::{DashboardError, VERSION};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct GeocodeParams {
    pub name: String,
    pub count: Option<u8>,
}

/// Variable lists are comma separated, as the forecast service takes them
#[derive(Deserialize)]
pub struct ForecastParams {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    pub hourly: Option<String>,
    pub daily: Option<String>,
    pub forecast_days: Option<u8>,
}

impl DashboardError {
    /// HTTP status for an API error response.
    ///
    /// The API handlers answer an empty search with `[]` and never return
    /// `EmptyResult`; only the `search` CLI command raises it.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::EmptyResult { .. } => StatusCode::NOT_FOUND,
            Self::Network { .. } | Self::Decode { .. } => StatusCode::BAD_GATEWAY,
            Self::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!("API request failed: {}", self);
        }
        let body = ErrorBody {
            error: self.code().to_string(),
            message: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/geocode", get(geocode))
        .route("/forecast", get(forecast))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
    })
}

async fn geocode(
    State(state): State<AppState>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<Vec<PlaceCandidate>>, DashboardError> {
    let count = params.count.unwrap_or(state.defaults.max_results);
    let candidates = state.service.search(&params.name, count).await?;
    Ok(Json(candidates))
}

async fn forecast(
    State(state): State<AppState>,
    Query(params): Query<ForecastParams>,
) -> Result<Json<ForecastDocument>, DashboardError> {
    let hourly: Vec<HourlyVariable> = match params.hourly.as_deref() {
        Some(list) => variables::parse_list(list)?,
        None => Vec::new(),
    };
    let daily: Vec<DailyVariable> = match params.daily.as_deref() {
        Some(list) => variables::parse_list(list)?,
        None => Vec::new(),
    };
    let query = ForecastQuery::new(
        params.latitude,
        params.longitude,
        params.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE),
        &hourly,
        &daily,
        params.forecast_days.unwrap_or(state.defaults.forecast_days),
    )?;

    let document = state.service.fetch(&query).await?;
    Ok(Json(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DashboardError::validation("x"), StatusCode::BAD_REQUEST)]
    #[case(DashboardError::network("x"), StatusCode::BAD_GATEWAY)]
    #[case(DashboardError::status(500, "x"), StatusCode::BAD_GATEWAY)]
    #[case(DashboardError::decode("x"), StatusCode::BAD_GATEWAY)]
    #[case(DashboardError::empty_result("x"), StatusCode::NOT_FOUND)]
    #[case(DashboardError::config("x"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_mapping(#[case] err: DashboardError, #[case] expected: StatusCode) {
        assert_eq!(err.status_code(), expected);
        assert_eq!(err.into_response().status(), expected);
    }
}

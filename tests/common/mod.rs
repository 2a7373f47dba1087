//! Shared fixtures for the integration tests

#![allow(dead_code)]

use meteodash::MeteoDashConfig;
use serde_json::{Value, json};
use wiremock::MockServer;

/// Config whose geocoding and forecast endpoints both point at `server`
pub fn config_for(server: &MockServer) -> MeteoDashConfig {
    let mut config = MeteoDashConfig::default();
    config.geocoding.base_url = server.uri();
    config.forecast.base_url = server.uri();
    config
}

pub fn geocode_result(name: &str, country: &str, admin1: &str, lat: f64, lon: f64, tz: &str) -> Value {
    json!({
        "id": 1,
        "name": name,
        "latitude": lat,
        "longitude": lon,
        "country": country,
        "admin1": admin1,
        "timezone": tz,
    })
}

pub fn seoul_geocode() -> Value {
    json!({
        "results": [
            geocode_result("Seoul", "South Korea", "Seoul", 37.566, 126.9784, "Asia/Seoul"),
        ],
        "generationtime_ms": 0.5
    })
}

/// Forecast body for Seoul with 3 hourly rows and 7 daily rows
pub fn seoul_forecast() -> Value {
    json!({
        "latitude": 37.55,
        "longitude": 127.0,
        "timezone": "Asia/Seoul",
        "current_weather": {
            "temperature": 18.4,
            "windspeed": 7.2,
            "winddirection": 250.0,
            "weathercode": 1,
            "time": "2024-05-01T13:00"
        },
        "hourly_units": {
            "time": "iso8601",
            "temperature_2m": "°C",
            "precipitation": "mm"
        },
        "hourly": {
            "time": ["2024-05-01T00:00", "2024-05-01T01:00", "2024-05-01T02:00"],
            "temperature_2m": [12.1, null, 11.4],
            "precipitation": [0.0, 0.0, 0.1]
        },
        "daily_units": {
            "time": "iso8601",
            "temperature_2m_max": "°C",
            "temperature_2m_min": "°C",
            "precipitation_sum": "mm"
        },
        "daily": {
            "time": [
                "2024-05-01", "2024-05-02", "2024-05-03", "2024-05-04",
                "2024-05-05", "2024-05-06", "2024-05-07"
            ],
            "temperature_2m_max": [21.3, 22.0, 19.8, 23.5, 24.1, 20.2, 18.9],
            "temperature_2m_min": [11.0, 12.4, 10.9, 13.2, 14.0, 12.8, 10.1],
            "precipitation_sum": [0.0, 0.0, 4.2, 0.0, 0.3, 12.5, 1.1]
        }
    })
}

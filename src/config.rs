//! Configuration management for the `MeteoDash` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::DashboardError;
use crate::models::{DailyVariable, HourlyVariable, MAX_FORECAST_DAYS};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the `MeteoDash` application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeteoDashConfig {
    /// Web server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Geocoding service settings
    #[serde(default)]
    pub geocoding: EndpointConfig,
    /// Forecast service settings
    #[serde(default = "EndpointConfig::forecast")]
    pub forecast: EndpointConfig,
    /// Outbound HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Initial values of the dashboard controls
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Settings for one remote read endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL, without the trailing resource path
    #[serde(default)]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_seconds: u32,
    /// How long successful responses are memoized
    #[serde(default)]
    pub cache_ttl_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Retries for transient failures; 0 surfaces every failure immediately
    #[serde(default)]
    pub max_retries: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Default dashboard control values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_query")]
    pub query: String,
    #[serde(default = "default_max_results")]
    pub max_results: u8,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,
    #[serde(default = "default_hourly")]
    pub hourly: Vec<HourlyVariable>,
    #[serde(default = "default_daily")]
    pub daily: Vec<DailyVariable>,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_user_agent() -> String {
    format!("MeteoDash/{}", env!("CARGO_PKG_VERSION"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_query() -> String {
    "Seoul".to_string()
}

fn default_max_results() -> u8 {
    5
}

fn default_forecast_days() -> u8 {
    7
}

fn default_hourly() -> Vec<HourlyVariable> {
    vec![HourlyVariable::Temperature2m, HourlyVariable::Precipitation]
}

fn default_daily() -> Vec<DailyVariable> {
    vec![
        DailyVariable::Temperature2mMax,
        DailyVariable::Temperature2mMin,
        DailyVariable::PrecipitationSum,
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl EndpointConfig {
    pub const GEOCODING_BASE_URL: &str = "https://geocoding-api.open-meteo.com/v1";
    pub const FORECAST_BASE_URL: &str = "https://api.open-meteo.com/v1";

    /// Geocoding defaults: 10 s timeout, results kept for one hour
    #[must_use]
    pub fn geocoding() -> Self {
        Self {
            base_url: Self::GEOCODING_BASE_URL.to_string(),
            timeout_seconds: 10,
            cache_ttl_seconds: 60 * 60,
        }
    }

    /// Forecast defaults: 15 s timeout, results kept for ten minutes
    #[must_use]
    pub fn forecast() -> Self {
        Self {
            base_url: Self::FORECAST_BASE_URL.to_string(),
            timeout_seconds: 15,
            cache_ttl_seconds: 60 * 10,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds.into())
    }

    fn apply_defaults(&mut self, fallback: Self) {
        if self.base_url.is_empty() {
            self.base_url = fallback.base_url;
        }
        if self.timeout_seconds == 0 {
            self.timeout_seconds = fallback.timeout_seconds;
        }
        if self.cache_ttl_seconds == 0 {
            self.cache_ttl_seconds = fallback.cache_ttl_seconds;
        }
    }

    fn validate(&self, label: &str) -> Result<(), DashboardError> {
        if self.timeout_seconds > 300 {
            return Err(DashboardError::config(format!(
                "{label} timeout cannot exceed 300 seconds"
            )));
        }
        if self.cache_ttl_seconds > 7 * 24 * 60 * 60 {
            return Err(DashboardError::config(format!(
                "{label} cache TTL cannot exceed 1 week"
            )));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(DashboardError::config(format!(
                "{label} base URL must be a valid HTTP or HTTPS URL"
            )));
        }
        Ok(())
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::geocoding()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            max_retries: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            query: default_query(),
            max_results: default_max_results(),
            forecast_days: default_forecast_days(),
            hourly: default_hourly(),
            daily: default_daily(),
        }
    }
}

impl Default for MeteoDashConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            geocoding: EndpointConfig::geocoding(),
            forecast: EndpointConfig::forecast(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
            defaults: DefaultsConfig::default(),
        }
    }
}

impl MeteoDashConfig {
    /// Load configuration from `config_path`, or the default location when `None`,
    /// then apply environment overrides
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // An explicit path must exist; the default location is optional
        match config_path {
            Some(path) => {
                builder = builder.add_source(
                    File::from(path)
                        .required(true)
                        .format(config::FileFormat::Toml),
                );
            }
            None => {
                if let Some(path) = Self::get_config_path().filter(|p| p.exists()) {
                    builder = builder.add_source(
                        File::from(path)
                            .required(false)
                            .format(config::FileFormat::Toml),
                    );
                }
            }
        }

        // METEODASH_SERVER__PORT=9000 overrides server.port
        builder = builder.add_source(
            Environment::with_prefix("METEODASH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: MeteoDashConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("meteodash").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        self.geocoding.apply_defaults(EndpointConfig::geocoding());
        self.forecast.apply_defaults(EndpointConfig::forecast());
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.http.user_agent.is_empty() {
            self.http.user_agent = default_user_agent();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.query.trim().is_empty() {
            self.defaults.query = default_query();
        }
        if self.defaults.max_results == 0 {
            self.defaults.max_results = default_max_results();
        }
        if self.defaults.forecast_days == 0 {
            self.defaults.forecast_days = default_forecast_days();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<(), DashboardError> {
        self.geocoding.validate("Geocoding")?;
        self.forecast.validate("Forecast")?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<(), DashboardError> {
        if self.http.max_retries > 10 {
            return Err(DashboardError::config("HTTP max retries cannot exceed 10"));
        }

        if !(1..=10).contains(&self.defaults.max_results) {
            return Err(DashboardError::config(
                "Default result count must be between 1 and 10",
            ));
        }

        if !(1..=MAX_FORECAST_DAYS).contains(&self.defaults.forecast_days) {
            return Err(DashboardError::config(format!(
                "Default forecast days must be between 1 and {MAX_FORECAST_DAYS}"
            )));
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<(), DashboardError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DashboardError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DashboardError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        Ok(())
    }

    /// Address the web server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = MeteoDashConfig::default();
        assert_eq!(
            config.geocoding.base_url,
            "https://geocoding-api.open-meteo.com/v1"
        );
        assert_eq!(config.forecast.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.geocoding.timeout(), Duration::from_secs(10));
        assert_eq!(config.forecast.timeout(), Duration::from_secs(15));
        assert_eq!(config.geocoding.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.forecast.cache_ttl(), Duration::from_secs(600));
        assert_eq!(config.http.max_retries, 0);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.defaults.query, "Seoul");
        assert_eq!(config.defaults.max_results, 5);
        assert_eq!(config.defaults.forecast_days, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = MeteoDashConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = MeteoDashConfig::default();
        config.forecast.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        let mut config = MeteoDashConfig::default();
        config.defaults.forecast_days = 17;
        assert!(config.validate().is_err());

        let mut config = MeteoDashConfig::default();
        config.defaults.max_results = 11;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = MeteoDashConfig::default();
        config.geocoding.base_url = "ftp://example.com".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("HTTP or HTTPS"));
    }

    #[test]
    fn test_apply_defaults_fills_zero_values() {
        let mut config = MeteoDashConfig::default();
        config.forecast.timeout_seconds = 0;
        config.forecast.base_url.clear();
        config.defaults.max_results = 0;
        config.apply_defaults();
        assert_eq!(config.forecast.timeout_seconds, 15);
        assert_eq!(config.forecast.base_url, EndpointConfig::FORECAST_BASE_URL);
        assert_eq!(config.defaults.max_results, 5);
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9123

[forecast]
base_url = "http://localhost:1234/v1"
timeout_seconds = 5
cache_ttl_seconds = 60

[defaults]
hourly = ["weathercode"]
"#
        )
        .unwrap();

        let config = MeteoDashConfig::load_from_path(Some(path)).unwrap();
        assert_eq!(config.server.port, 9123);
        assert_eq!(config.forecast.base_url, "http://localhost:1234/v1");
        assert_eq!(config.forecast.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.geocoding.base_url, EndpointConfig::GEOCODING_BASE_URL);
        assert_eq!(config.defaults.hourly, vec![HourlyVariable::WeatherCode]);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = PathBuf::from("/nonexistent/meteodash/config.toml");
        assert!(MeteoDashConfig::load_from_path(Some(path)).is_err());
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = MeteoDashConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("meteodash"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}

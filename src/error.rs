//! Error types and handling for the `MeteoDash` application

use thiserror::Error;

/// Main error type for the `MeteoDash` application
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Transport failure, timeout, or non-success status from a remote service
    #[error("Network error: {message}")]
    Network {
        message: String,
        status: Option<u16>,
    },

    /// Response body did not have the expected shape
    #[error("Invalid response: {message}")]
    Decode { message: String },

    /// Input validation errors, raised before any network call
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Geocoding returned zero candidates
    #[error("No place matched '{query}'")]
    EmptyResult { query: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl DashboardError {
    /// Create a new network error without a status code
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            status: None,
        }
    }

    /// Create a new network error for a non-success HTTP status
    pub fn status<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Network {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new empty-result error
    pub fn empty_result<S: Into<String>>(query: S) -> Self {
        Self::EmptyResult {
            query: query.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Stable machine-readable code, used by the JSON API
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network_error",
            Self::Decode { .. } => "invalid_response",
            Self::Validation { .. } => "invalid_input",
            Self::EmptyResult { .. } => "no_results",
            Self::Config { .. } => "config_error",
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { status: Some(status), .. } => {
                format!("The weather service answered with HTTP {status}. Please try again later.")
            }
            Self::Network { status: None, .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            Self::Decode { .. } => {
                "The weather service returned data in an unexpected format.".to_string()
            }
            Self::Validation { message } => format!("Invalid input: {message}"),
            Self::EmptyResult { query } => {
                format!("No place matched '{query}'. Try a different name.")
            }
            Self::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::decode(err.to_string());
        }
        Self::Network {
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
        }
    }
}

impl From<reqwest_middleware::Error> for DashboardError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => e.into(),
            reqwest_middleware::Error::Middleware(e) => Self::network(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let network_err = DashboardError::network("connection refused");
        assert!(matches!(network_err, DashboardError::Network { status: None, .. }));

        let status_err = DashboardError::status(503, "unavailable");
        assert!(matches!(
            status_err,
            DashboardError::Network { status: Some(503), .. }
        ));

        let validation_err = DashboardError::validation("query must not be empty");
        assert!(matches!(validation_err, DashboardError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let network_err = DashboardError::network("test");
        assert!(network_err.user_message().contains("Unable to reach"));

        let status_err = DashboardError::status(502, "bad gateway");
        assert!(status_err.user_message().contains("502"));

        let validation_err = DashboardError::validation("count out of range");
        assert!(validation_err.user_message().contains("count out of range"));

        let empty = DashboardError::empty_result("Atlantis");
        assert!(empty.user_message().contains("different name"));
        assert_eq!(empty.to_string(), "No place matched 'Atlantis'");
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            DashboardError::network("x").code(),
            DashboardError::decode("x").code(),
            DashboardError::validation("x").code(),
            DashboardError::empty_result("x").code(),
            DashboardError::config("x").code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

//! Shared outbound HTTP client

use std::time::{Duration, Instant};

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::HttpConfig;
use crate::{DashboardError, Result};

/// Responses slower than this are logged as a warning
const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// Build the HTTP client used by both remote reads.
///
/// The transient-retry middleware is only installed when `max_retries > 0`.
pub fn build_client(config: &HttpConfig) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| DashboardError::config(format!("Failed to create HTTP client: {e}")))?;

    let mut builder = ClientBuilder::new(client);
    if config.max_retries > 0 {
        let policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(policy));
    }
    Ok(builder.build())
}

/// GET `url` with a per-request timeout and decode the JSON body.
///
/// Non-success statuses become [`DashboardError::Network`] carrying the status code.
pub async fn get_json<T: DeserializeOwned>(
    client: &ClientWithMiddleware,
    url: &str,
    timeout: Duration,
) -> Result<T> {
    let start_time = Instant::now();
    let response = client.get(url).timeout(timeout).send().await?;

    let status = response.status();
    debug!(
        "HTTP response received: {} in {:.3}s",
        status,
        start_time.elapsed().as_secs_f64()
    );

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let excerpt: String = body.chars().take(300).collect();
        return Err(DashboardError::status(
            status.as_u16(),
            format!("Request failed with status {status}: {excerpt}"),
        ));
    }

    let body: T = response.json().await?;

    let total = start_time.elapsed();
    if total > SLOW_RESPONSE {
        warn!("Slow API response detected: {:.3}s", total.as_secs_f64());
    }
    Ok(body)
}

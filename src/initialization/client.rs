//! HTTP client initialization.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, CAPABILITY_TIMEOUT_SECS};
use crate::error_handling::InitializationError;

/// Initializes the HTTP client used to fetch source pages and article text.
///
/// Creates a `reqwest::Client` configured with the User-Agent and request
/// timeout from the configuration. Redirects are followed with reqwest's
/// default policy.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: &Config) -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

/// Initializes the client for the analysis, embedding and browser services.
///
/// Model inference is slow, so these calls get a longer timeout than page
/// fetches.
pub fn init_service_client(config: &Config) -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(CAPABILITY_TIMEOUT_SECS))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

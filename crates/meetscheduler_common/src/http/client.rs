// --- File: crates/meetscheduler_common/src/http/client.rs ---
use meetscheduler_config::ApiEndpointConfig;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Error as ReqwestError};
use std::time::Duration;

/// Creates the HTTP client for one backend: its timeout and a JSON content type
/// on every request.
pub fn client_for_endpoint(endpoint: &ApiEndpointConfig) -> Result<Client, ReqwestError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Client::builder()
        .timeout(Duration::from_secs(endpoint.timeout_secs))
        .default_headers(headers)
        .build()
}

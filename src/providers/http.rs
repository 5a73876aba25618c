/*!
 * HTTP plumbing shared by the provider clients.
 */

use log::error;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;

/// Build an HTTP client with the given request timeout
pub fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()
        .unwrap_or_default()
}

/// Join a base endpoint and a path into a URL, with optional query pairs
pub fn endpoint_url(endpoint: &str, path: &str, query: &[(&str, &str)]) -> Result<Url, ProviderError> {
    let base = endpoint.trim_end_matches('/');
    let raw = match path.trim_start_matches('/') {
        "" => base.to_string(),
        path => format!("{}/{}", base, path),
    };
    let mut url = Url::parse(&raw)
        .map_err(|e| ProviderError::InvalidRequest(format!("invalid endpoint '{}': {}", raw, e)))?;

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}

/// Send a request and decode a JSON body, mapping HTTP failures to `ProviderError`
pub async fn send_json<T: DeserializeOwned>(provider: &str, request: RequestBuilder) -> Result<T, ProviderError> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        error!("{} API error ({}): {}", provider, status, error_text);
        return Err(ProviderError::from_status(status.as_u16(), error_text));
    }

    let body = response.text().await?;
    serde_json::from_str::<T>(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        ProviderError::ParseError(format!("{} (body starts with: {})", e, preview))
    })
}

/// Ensure a vendor returned one item per input
pub fn expect_count<T>(items: Vec<T>, expected: usize) -> Result<Vec<T>, ProviderError> {
    if items.len() != expected {
        return Err(ProviderError::ParseError(format!(
            "expected {} translations, got {}",
            expected,
            items.len()
        )));
    }
    Ok(items)
}

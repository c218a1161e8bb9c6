//! Client for the upstream APOD API
//!
//! `GET <api_url>?api_key=<KEY>[&date=YYYY-MM-DD]`. The response is either an
//! entry, a non-success status, or a 2xx body with an `error` field. The date is
//! forwarded as-is; validating it is the upstream's job.

use crate::config::Config;
use crate::constants::UPSTREAM_ERROR_FALLBACK;
use crate::error::ProxyError;
use crate::models::MediaEntry;
use crate::utils::is_truthy;
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

pub struct ApodClient {
    client: reqwest::Client,
    api_url: Url,
    api_key: String,
}

impl ApodClient {
    /// Create a client sharing the given connection pool
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Build the upstream request URL; without a date the upstream returns the latest entry
    pub fn request_url(&self, date: Option<&str>) -> Url {
        let mut url = self.api_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &self.api_key);
            if let Some(date) = date {
                query.append_pair("date", date);
            }
        }
        url
    }

    /// Fetch one entry from the upstream API
    pub async fn fetch_entry(&self, date: Option<&str>) -> Result<MediaEntry, ProxyError> {
        let url = self.request_url(date);

        // The URL carries the API key, so only the date goes into the logs
        debug!(date = date.unwrap_or("latest"), "Requesting APOD entry from upstream");

        let response = self.client.get(url).send().await.map_err(|e| {
            let e = e.without_url();
            error!(
                date = date.unwrap_or("latest"),
                timeout = e.is_timeout(),
                error = %e,
                "APOD API request failed"
            );
            ProxyError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(date = date.unwrap_or("latest"), %status, "APOD API returned error status");
            return Err(ProxyError::UpstreamStatus {
                status: status.as_u16(),
                message: format!("NASA API error: {}", status),
            });
        }

        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            error!(error = %e, "Failed to read APOD API response body");
            ProxyError::Transport(e)
        })?;

        parse_entry(&body)
    }
}

/// Decode an upstream 2xx body, turning an embedded `error` field into an error
///
/// A falsy `error` (`null`, `false`, `""`, `0`) is not an error; the entry is
/// returned with the field left in place.
pub fn parse_entry(body: &str) -> Result<MediaEntry, ProxyError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| ProxyError::Decode(format!("Failed to parse JSON response: {}", e)))?;

    if let Some(err) = json.get("error").filter(|v| is_truthy(v)) {
        let message = match err {
            Value::String(s) => s.clone(),
            other => other
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(UPSTREAM_ERROR_FALLBACK)
                .to_string(),
        };
        warn!(upstream_message = %message, "APOD API reported an error");
        return Err(ProxyError::UpstreamReported(message));
    }

    serde_json::from_value(json)
        .map_err(|e| ProxyError::Decode(format!("Unexpected APOD entry shape: {}", e)))
}

use crate::constants::{CACHE_MAX_AGE_DATED_SECS, CACHE_MAX_AGE_LATEST_SECS};
use crate::server::AppState;
use crate::services::{write_api_log_entry, ApiPerformanceMetrics, ApiStatus, SharedHealthStats};
use axum::{
    extract::{Query, State},
    http::{header::CACHE_CONTROL, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{debug, instrument};

/// The `date` query parameter, when it is given exactly once and is non-empty
///
/// Anything else (absent, empty, repeated) means the latest entry.
pub fn requested_date(params: &[(String, String)]) -> Option<&str> {
    let mut dates = params
        .iter()
        .filter(|(key, _)| key == "date")
        .map(|(_, value)| value.as_str());

    match (dates.next(), dates.next()) {
        (Some(date), None) if !date.is_empty() => Some(date),
        _ => None,
    }
}

/// GET /api/apod - Proxy one APOD entry
///
/// Examples:
/// - /api/apod (latest entry, never scraped)
/// - /api/apod?date=2024-07-04
///
/// The date is forwarded to the upstream unvalidated. Upstream failures come
/// back as `{"error": "..."}`; page extraction failures never do.
#[instrument(skip(app_state))]
pub async fn get_apod_handler(
    State(app_state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let mut metrics = ApiPerformanceMetrics::new(Utc::now());
    metrics.endpoint = "/api/apod".to_string();

    let date = requested_date(&params);
    metrics.date = date.map(str::to_string);

    let response = match app_state.service.get_entry(date).await {
        Ok(outcome) => {
            app_state.health_stats.record_success(outcome.extraction);
            metrics.extraction = outcome.extraction;

            let max_age = if date.is_some() {
                CACHE_MAX_AGE_DATED_SECS
            } else {
                CACHE_MAX_AGE_LATEST_SECS
            };
            let mut headers = HeaderMap::new();
            if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", max_age)) {
                headers.insert(CACHE_CONTROL, value);
            }

            (StatusCode::OK, headers, Json(outcome.entry)).into_response()
        }
        Err(e) => {
            app_state.health_stats.record_failure();
            metrics.status = ApiStatus::Fail;
            metrics.error_message = Some(e.to_string());
            e.into_response()
        }
    };

    metrics.http_status = response.status().as_u16();
    metrics.complete();
    write_api_log_entry(&metrics, app_state.config.log_dir.as_deref());

    response
}

/// GET /health - Uptime and request counters
pub async fn health_handler(State(health_stats): State<SharedHealthStats>) -> impl IntoResponse {
    debug!("Received request for health stats");

    // No request log for /health (too noisy)
    Json(health_stats.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_requested_date() {
        assert_eq!(requested_date(&params(&[("date", "2024-07-04")])), Some("2024-07-04"));
        assert_eq!(
            requested_date(&params(&[("thumbs", "true"), ("date", "2024-07-04")])),
            Some("2024-07-04")
        );

        assert_eq!(requested_date(&params(&[])), None);
        assert_eq!(requested_date(&params(&[("date", "")])), None);
        assert_eq!(
            requested_date(&params(&[("date", "2024-07-04"), ("date", "2024-07-05")])),
            None
        );
        assert_eq!(requested_date(&params(&[("date", "2024-07-04"), ("date", "")])), None);
    }
}

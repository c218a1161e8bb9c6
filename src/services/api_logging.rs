use crate::constants::API_LOG_MAX_BYTES;
use crate::services::ExtractionStatus;
use crate::utils::write_with_rotation;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{info, warn};

/// API request performance metrics
#[derive(Debug, Clone)]
pub struct ApiPerformanceMetrics {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_ms: u64,
    pub status: ApiStatus,
    pub endpoint: String,
    /// Requested date, `None` for the latest entry
    pub date: Option<String>,
    pub extraction: ExtractionStatus,
    pub http_status: u16,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Success,
    Fail,
}

impl ApiPerformanceMetrics {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time: Utc::now(),
            duration_ms: 0,
            status: ApiStatus::Success,
            endpoint: String::new(),
            date: None,
            extraction: ExtractionStatus::NotNeeded,
            http_status: 200,
            error_message: None,
        }
    }

    pub fn complete(&mut self) {
        self.end_time = Utc::now();
        self.duration_ms = (self.end_time - self.start_time).num_milliseconds().max(0) as u64;
    }

    /// Compact single-line form used in `api_requests.log`
    pub fn to_log_line(&self) -> String {
        let status_str = match self.status {
            ApiStatus::Success => "OK",
            ApiStatus::Fail => "FAIL",
        };

        let duration_str = if self.duration_ms >= 1000 {
            format!("{}.{:01}s", self.duration_ms / 1000, (self.duration_ms % 1000) / 100)
        } else {
            format!("{}ms", self.duration_ms)
        };

        let error_info = if let Some(ref error) = self.error_message {
            format!(" error:{}", error)
        } else {
            String::new()
        };

        format!(
            "{} | {} | {} | {} | {} | http:{} date:{} extraction:{}{}\n",
            self.start_time.format("%Y-%m-%d %H:%M:%S"),
            self.end_time.format("%Y-%m-%d %H:%M:%S"),
            duration_str,
            self.endpoint,
            status_str,
            self.http_status,
            self.date.as_deref().unwrap_or("latest"),
            self.extraction,
            error_info
        )
    }
}

/// Record one API request: a structured event, plus a line in
/// `<log_dir>/api_requests.log` when a log directory is configured
pub fn write_api_log_entry(metrics: &ApiPerformanceMetrics, log_dir: Option<&Path>) {
    info!(
        endpoint = %metrics.endpoint,
        date = metrics.date.as_deref().unwrap_or("latest"),
        http_status = metrics.http_status,
        duration_ms = metrics.duration_ms,
        extraction = %metrics.extraction,
        error = metrics.error_message.as_deref(),
        "API request completed"
    );

    let Some(log_dir) = log_dir else {
        return;
    };

    let log_path = log_dir.join("api_requests.log");
    if let Err(e) = write_with_rotation(&log_path, &metrics.to_log_line(), API_LOG_MAX_BYTES) {
        warn!(path = %log_path.display(), error = %e, "Failed to write API request log");
    }
}

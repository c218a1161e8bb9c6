use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error as ThisError;

use crate::constants::GENERIC_ERROR_MESSAGE;

#[derive(ThisError, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Failure of a single proxied request, rendered as `{"error": "..."}`
#[derive(ThisError, Debug)]
pub enum ProxyError {
    /// Upstream answered with a non-success status; mirrored to the caller
    #[error("{message}")]
    UpstreamStatus { status: u16, message: String },

    /// Upstream answered 2xx but the body carries an `error` field
    #[error("{0}")]
    UpstreamReported(String),

    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream response could not be decoded: {0}")]
    Decode(String),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::UpstreamStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ProxyError::UpstreamReported(_) => StatusCode::BAD_REQUEST,
            ProxyError::Transport(_) | ProxyError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the client; transport details stay in the logs
    pub fn client_message(&self) -> String {
        match self {
            ProxyError::UpstreamStatus { message, .. } => message.clone(),
            ProxyError::UpstreamReported(message) => message.clone(),
            ProxyError::Transport(_) | ProxyError::Decode(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// Transient failures a client may retry: transport errors and upstream 5xx
    pub fn is_retryable(&self) -> bool {
        match self {
            ProxyError::Transport(_) => true,
            ProxyError::UpstreamStatus { status, .. } => *status >= 500,
            ProxyError::UpstreamReported(_) | ProxyError::Decode(_) => false,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "error": self.client_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_error_status_mapping() {
        let rate_limited = ProxyError::UpstreamStatus {
            status: 429,
            message: "NASA API error: 429 Too Many Requests".to_string(),
        };
        assert_eq!(rate_limited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(rate_limited.client_message(), "NASA API error: 429 Too Many Requests");
        assert!(!rate_limited.is_retryable());

        let reported = ProxyError::UpstreamReported("Date must be between Jun 16, 1995 and today".to_string());
        assert_eq!(reported.status_code(), StatusCode::BAD_REQUEST);
        assert!(!reported.is_retryable());

        let decode = ProxyError::Decode("expected value at line 1".to_string());
        assert_eq!(decode.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(decode.client_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_upstream_server_errors_are_retryable() {
        let unavailable = ProxyError::UpstreamStatus {
            status: 503,
            message: "NASA API error: 503 Service Unavailable".to_string(),
        };
        assert!(unavailable.is_retryable());
        assert_eq!(unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

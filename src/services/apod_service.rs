use crate::config::Config;
use crate::error::{AppError, ProxyError, Result};
use crate::models::MediaEntry;
use crate::services::apod_client::ApodClient;
use crate::services::page_extractor::{ApodPageExtractor, MediaExtractor};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// What happened to the secondary page lookup for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStatus {
    /// Upstream entry was usable, or no date was given
    NotNeeded,
    Extracted,
    /// Attempted, but the page was unreachable or had no match
    Unavailable,
}

impl ExtractionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStatus::NotNeeded => "not_needed",
            ExtractionStatus::Extracted => "extracted",
            ExtractionStatus::Unavailable => "unavailable",
        }
    }

    pub fn attempted(&self) -> bool {
        !matches!(self, ExtractionStatus::NotNeeded)
    }
}

impl fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ApodOutcome {
    pub entry: MediaEntry,
    pub extraction: ExtractionStatus,
}

/// Upstream fetch plus best-effort extraction fallback
pub struct ApodService {
    client: ApodClient,
    extractor: Arc<dyn MediaExtractor>,
}

impl ApodService {
    pub fn new(client: ApodClient, extractor: Arc<dyn MediaExtractor>) -> Self {
        Self { client, extractor }
    }

    /// Service with the page scraper as extraction strategy, sharing one connection pool
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        let client = ApodClient::new(http.clone(), config);
        let extractor = Arc::new(ApodPageExtractor::new(http, config));
        Ok(Self::new(client, extractor))
    }

    /// Fetch the entry for `date` (latest when `None`)
    ///
    /// Only upstream failures are returned as errors. When the entry has no
    /// direct media and a date was given, the extractor is consulted; if it
    /// finds nothing the upstream entry is returned untouched.
    pub async fn get_entry(
        &self,
        date: Option<&str>,
    ) -> std::result::Result<ApodOutcome, ProxyError> {
        let mut entry = self.client.fetch_entry(date).await?;

        let Some(date) = date else {
            return Ok(ApodOutcome { entry, extraction: ExtractionStatus::NotNeeded });
        };

        if !entry.needs_extraction() {
            return Ok(ApodOutcome { entry, extraction: ExtractionStatus::NotNeeded });
        }

        debug!(
            date,
            media_type = entry.raw_media_type().unwrap_or("none"),
            has_url = entry.url().is_some_and(|u| !u.is_empty()),
            "Entry lacks direct media"
        );

        let extraction = match self.extractor.extract_media(date).await {
            Some(media) => {
                info!(date, media_type = %media.media_type, "Using media extracted from page");
                entry.apply_extraction(media);
                ExtractionStatus::Extracted
            }
            None => ExtractionStatus::Unavailable,
        };

        Ok(ApodOutcome { entry, extraction })
    }
}

//! Media extraction from the APOD web page
//!
//! Some API entries come back as `media_type: other` or without a `url`. The
//! daily HTML page at `ap<YYMMDD>.html` usually still links the media, so it is
//! fetched and searched with two patterns, video first:
//!
//! - `<source src="...mp4...">` → video
//! - `<a href="...jpg|jpeg|png|gif..."><img` → image
//!
//! Extraction is best-effort: every failure ends in `None` and a log line.

use crate::config::Config;
use crate::constants::MAX_PAGE_BYTES;
use crate::models::{ExtractedMedia, MediaType};
use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info, warn};
use url::Url;

static VIDEO_SOURCE: OnceLock<Regex> = OnceLock::new();
static LINKED_IMAGE: OnceLock<Regex> = OnceLock::new();

fn video_source_pattern() -> &'static Regex {
    VIDEO_SOURCE.get_or_init(|| {
        Regex::new(r#"(?i)<source\s+src="([^"]*\.mp4[^"]*)"[^>]*>"#).unwrap()
    })
}

fn linked_image_pattern() -> &'static Regex {
    LINKED_IMAGE.get_or_init(|| {
        Regex::new(r#"(?i)<a\s+href="([^"]*\.(?:jpg|jpeg|png|gif)[^"]*)"[^>]*>\s*<img"#).unwrap()
    })
}

/// Strategy for recovering media for a date when the API response has none
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    async fn extract_media(&self, date: &str) -> Option<ExtractedMedia>;
}

/// Scrapes the fixed-format APOD daily page
pub struct ApodPageExtractor {
    client: reqwest::Client,
    page_base_url: Url,
    max_page_bytes: usize,
}

impl ApodPageExtractor {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            page_base_url: config.page_base_url.clone(),
            max_page_bytes: MAX_PAGE_BYTES,
        }
    }

    pub fn with_max_page_bytes(mut self, max_page_bytes: usize) -> Self {
        self.max_page_bytes = max_page_bytes;
        self
    }

    /// Page URL for a `YYYY-MM-DD` date, e.g. 2024-07-04 -> `ap240704.html`
    pub fn page_url(&self, date: &str) -> Option<Url> {
        let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
        self.page_base_url
            .join(&day.format("ap%y%m%d.html").to_string())
            .ok()
    }

    async fn fetch_page(&self, url: Url) -> Option<String> {
        let mut response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, timeout = e.is_timeout(), error = %e, "Failed to fetch APOD page");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(%url, status = %response.status(), "APOD page returned error status");
            return None;
        }

        let limit = self.max_page_bytes;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            warn!(%url, content_length = ?response.content_length(), limit, "APOD page too large, skipping");
            return None;
        }

        // Content-Length may be absent or wrong, so the limit is enforced while reading too
        let mut body = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    if body.len() + chunk.len() > limit {
                        warn!(%url, limit, "APOD page body exceeded limit, skipping");
                        return None;
                    }
                    body.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(%url, error = %e, "Failed to read APOD page body");
                    return None;
                }
            }
        }

        Some(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl MediaExtractor for ApodPageExtractor {
    async fn extract_media(&self, date: &str) -> Option<ExtractedMedia> {
        let Some(url) = self.page_url(date) else {
            debug!(date, "Date does not map to an APOD page, skipping extraction");
            return None;
        };

        info!(date, %url, "Attempting to extract media from APOD page");
        let html = self.fetch_page(url).await?;

        let media = parse_media(&html, &self.page_base_url);
        match &media {
            Some(m) => info!(date, media_type = %m.media_type, url = %m.url, "Extracted media from APOD page"),
            None => info!(date, "No media found on APOD page"),
        }
        media
    }
}

/// Search page HTML for a video source, then for a linked image
pub fn parse_media(html: &str, base: &Url) -> Option<ExtractedMedia> {
    let candidates = [
        (video_source_pattern(), MediaType::Video),
        (linked_image_pattern(), MediaType::Image),
    ];

    for (pattern, media_type) in candidates {
        let Some(reference) = pattern.captures(html).and_then(|c| c.get(1)) else {
            continue;
        };

        match resolve_reference(base, reference.as_str()) {
            Some(url) => return Some(ExtractedMedia { media_type, url }),
            None => {
                warn!(reference = reference.as_str(), "Unresolvable media reference on APOD page");
                return None;
            }
        }
    }

    None
}

/// Absolute references are kept, relative ones resolve against the page base
fn resolve_reference(base: &Url, reference: &str) -> Option<String> {
    base.join(reference.trim()).ok().map(String::from)
}

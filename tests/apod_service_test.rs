use apod_proxy::services::{ApodClient, ApodPageExtractor, ApodService, ExtractionStatus, MediaExtractor};
use apod_proxy::{Config, ExtractedMedia, MediaType};
use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Extractor that records the dates it was asked about
struct RecordingExtractor {
    calls: Mutex<Vec<String>>,
    result: Option<ExtractedMedia>,
}

impl RecordingExtractor {
    fn new(result: Option<ExtractedMedia>) -> Arc<Self> {
        Arc::new(Self { calls: Mutex::new(Vec::new()), result })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaExtractor for RecordingExtractor {
    async fn extract_media(&self, date: &str) -> Option<ExtractedMedia> {
        self.calls.lock().unwrap().push(date.to_string());
        self.result.clone()
    }
}

async fn service_with(
    server: &MockServer,
    upstream: serde_json::Value,
    extractor: Arc<RecordingExtractor>,
) -> ApodService {
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream))
        .mount(server)
        .await;

    let config = Config::with_endpoints(
        &format!("{}/planetary/apod", server.uri()),
        &format!("{}/apod/", server.uri()),
    )
    .unwrap();
    let client = ApodClient::new(reqwest::Client::new(), &config);
    ApodService::new(client, extractor)
}

fn hubble_image() -> ExtractedMedia {
    ExtractedMedia {
        media_type: MediaType::Image,
        url: "https://apod.nasa.gov/apod/image/2407/hubble.jpg".to_string(),
    }
}

#[tokio::test]
async fn test_extractor_not_called_without_date() {
    let server = MockServer::start().await;
    let extractor = RecordingExtractor::new(Some(hubble_image()));
    let service = service_with(
        &server,
        json!({"date": "2025-03-01", "title": "t", "explanation": "e", "media_type": "other"}),
        extractor.clone(),
    )
    .await;

    let outcome = service.get_entry(None).await.unwrap();

    assert_eq!(outcome.extraction, ExtractionStatus::NotNeeded);
    assert_eq!(outcome.entry.media_type(), Some(MediaType::Other));
    assert!(extractor.calls().is_empty());
}

#[tokio::test]
async fn test_extractor_not_called_for_direct_media() {
    let server = MockServer::start().await;
    let extractor = RecordingExtractor::new(Some(hubble_image()));
    let service = service_with(
        &server,
        json!({
            "date": "2024-07-04", "title": "t", "explanation": "e",
            "media_type": "video", "url": "https://www.youtube.com/embed/abc"
        }),
        extractor.clone(),
    )
    .await;

    let outcome = service.get_entry(Some("2024-07-04")).await.unwrap();

    assert_eq!(outcome.extraction, ExtractionStatus::NotNeeded);
    assert_eq!(outcome.entry.url(), Some("https://www.youtube.com/embed/abc"));
    assert!(extractor.calls().is_empty());
}

#[tokio::test]
async fn test_extraction_result_is_merged() {
    let server = MockServer::start().await;
    let extractor = RecordingExtractor::new(Some(hubble_image()));
    let service = service_with(
        &server,
        json!({"date": "2024-07-04", "title": "t", "explanation": "e", "media_type": "other"}),
        extractor.clone(),
    )
    .await;

    let outcome = service.get_entry(Some("2024-07-04")).await.unwrap();

    assert_eq!(extractor.calls(), vec!["2024-07-04".to_string()]);
    assert_eq!(outcome.extraction, ExtractionStatus::Extracted);
    assert_eq!(outcome.entry.media_type(), Some(MediaType::Image));
    assert_eq!(outcome.entry.url(), Some("https://apod.nasa.gov/apod/image/2407/hubble.jpg"));
    assert!(outcome.entry.extracted_from_page());
}

#[tokio::test]
async fn test_no_extraction_keeps_entry() {
    let server = MockServer::start().await;
    let extractor = RecordingExtractor::new(None);
    let service = service_with(
        &server,
        json!({"date": "2024-07-05", "title": "t", "explanation": "e", "media_type": "video"}),
        extractor.clone(),
    )
    .await;

    let outcome = service.get_entry(Some("2024-07-05")).await.unwrap();

    assert_eq!(extractor.calls().len(), 1);
    assert_eq!(outcome.extraction, ExtractionStatus::Unavailable);
    assert_eq!(outcome.entry.media_type(), Some(MediaType::Video));
    assert!(outcome.entry.url().is_none());
    assert!(!outcome.entry.extracted_from_page());
}

#[tokio::test]
async fn test_unknown_media_type_with_url_is_left_alone() {
    let server = MockServer::start().await;
    let extractor = RecordingExtractor::new(Some(hubble_image()));
    let upstream = json!({
        "date": "2024-07-06", "title": null, "media_type": "interactive",
        "url": "https://apod.nasa.gov/apod/interactive/app.html"
    });
    let service = service_with(&server, upstream.clone(), extractor.clone()).await;

    let outcome = service.get_entry(Some("2024-07-06")).await.unwrap();

    assert!(extractor.calls().is_empty());
    assert_eq!(outcome.extraction, ExtractionStatus::NotNeeded);
    assert_eq!(serde_json::to_value(&outcome.entry).unwrap(), upstream);
}

async fn mount_page(server: &MockServer, page: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(format!("/apod/{page}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_page_extractor_skips_oversized_page() {
    let server = MockServer::start().await;
    // A matching tag followed by padding well past the limit
    let html = format!(
        r#"<source src="image/2407/big.mp4" type="video/mp4">{}"#,
        "<p>padding</p>".repeat(1024)
    );
    mount_page(&server, "ap240707.html", html).await;

    let config = Config::with_endpoints(
        &format!("{}/planetary/apod", server.uri()),
        &format!("{}/apod/", server.uri()),
    )
    .unwrap();
    let extractor = ApodPageExtractor::new(reqwest::Client::new(), &config).with_max_page_bytes(4096);

    assert_eq!(extractor.extract_media("2024-07-07").await, None);
}

#[tokio::test]
async fn test_page_extractor_reads_page_within_limit() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "ap240708.html",
        r#"<source src="image/2407/small.mp4" type="video/mp4">"#.to_string(),
    )
    .await;

    let config = Config::with_endpoints(
        &format!("{}/planetary/apod", server.uri()),
        &format!("{}/apod/", server.uri()),
    )
    .unwrap();
    let extractor = ApodPageExtractor::new(reqwest::Client::new(), &config).with_max_page_bytes(4096);

    let media = extractor.extract_media("2024-07-08").await.unwrap();
    assert_eq!(media.media_type, MediaType::Video);
    assert_eq!(media.url, format!("{}/apod/image/2407/small.mp4", server.uri()));
}

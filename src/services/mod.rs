pub mod api_logging;
pub mod apod_client;
pub mod apod_service;
pub mod health;
pub mod page_extractor;

pub use api_logging::{write_api_log_entry, ApiPerformanceMetrics, ApiStatus};
pub use apod_client::ApodClient;
pub use apod_service::{ApodOutcome, ApodService, ExtractionStatus};
pub use health::{HealthSnapshot, HealthStats, SharedHealthStats};
pub use page_extractor::{ApodPageExtractor, MediaExtractor};

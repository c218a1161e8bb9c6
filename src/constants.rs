//! Upstream endpoints and defaults
//!
//! Everything here is a default only. Runtime values live in [`crate::config::Config`],
//! which is built once at startup and handed to the service.

/// Upstream APOD API endpoint
pub const DEFAULT_API_URL: &str = "https://api.nasa.gov/planetary/apod";

/// Base path of the APOD website; daily pages live at `ap<YYMMDD>.html` below it
/// and relative media references on those pages resolve against it.
pub const DEFAULT_PAGE_BASE_URL: &str = "https://apod.nasa.gov/apod/";

/// Shared, rate-limited public key used when `NASA_API_KEY` is not set
pub const DEMO_API_KEY: &str = "DEMO_KEY";

/// Bounded timeout applied to both outbound fetches
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// First day of the APOD feed
pub const FEED_START_DATE: &str = "1995-06-16";

/// Error body returned for transport and decode failures on the primary fetch
pub const GENERIC_ERROR_MESSAGE: &str = "Internal server error while fetching APOD data";

/// Fallback when an upstream error body carries no usable message
pub const UPSTREAM_ERROR_FALLBACK: &str = "Failed to fetch APOD data";

/// Largest APOD page body read for media extraction; bigger pages are skipped
pub const MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;

/// Cache-Control max-age for an explicit date (published entries do not change)
pub const CACHE_MAX_AGE_DATED_SECS: u32 = 86_400;

/// Cache-Control max-age for the latest entry
pub const CACHE_MAX_AGE_LATEST_SECS: u32 = 300;

/// Rotate `api_requests.log` once it grows past this size
pub const API_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Retry policy of the `fetch` command: attempts after the first one
pub const FETCH_MAX_RETRIES: u32 = 2;

/// Retry backoff cap of the `fetch` command
pub const FETCH_MAX_BACKOFF_MS: u64 = 30_000;

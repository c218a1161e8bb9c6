use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use tracing::{info, warn};
use url::Url;

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_HOST, DEFAULT_PAGE_BASE_URL, DEFAULT_PORT,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEMO_API_KEY,
};
use crate::error::{AppError, Result};

/// Runtime configuration, built once at startup and passed to the service
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: Url,
    /// Must end with `/` so relative media paths join below it
    pub page_base_url: Url,
    pub request_timeout: Duration,
    pub host: String,
    pub port: u16,
    /// Built client assets served at `/`
    pub static_dir: Option<PathBuf>,
    /// Directory for `api_requests.log`
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = match lookup("NASA_API_KEY").filter(|k| !k.trim().is_empty()) {
            Some(key) => key.trim().to_string(),
            None => {
                warn!("NASA_API_KEY not set, using shared {DEMO_API_KEY} (rate limited)");
                DEMO_API_KEY.to_string()
            }
        };

        let api_url = parse_url("APOD_API_URL", &load(&lookup, "APOD_API_URL", DEFAULT_API_URL))?;
        let page_base_url = parse_base_url(
            "APOD_PAGE_BASE_URL",
            &load(&lookup, "APOD_PAGE_BASE_URL", DEFAULT_PAGE_BASE_URL),
        )?;

        let timeout_secs: u64 = try_load(
            &lookup,
            "APOD_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )?;
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "APOD_REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            api_url,
            page_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            host: load(&lookup, "HOST", DEFAULT_HOST),
            port: try_load(&lookup, "PORT", &DEFAULT_PORT.to_string())?,
            static_dir: lookup("STATIC_DIR").map(PathBuf::from),
            log_dir: lookup("APOD_LOG_DIR").map(PathBuf::from),
        })
    }

    /// Upstream API and page base pointed at the given URLs, everything else default
    pub fn with_endpoints(api_url: &str, page_base_url: &str) -> Result<Self> {
        Ok(Self {
            api_url: parse_url("api_url", api_url)?,
            page_base_url: parse_base_url("page_base_url", page_base_url)?,
            ..Self::default()
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: DEMO_API_KEY.to_string(),
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            page_base_url: Url::parse(DEFAULT_PAGE_BASE_URL).expect("default page URL is valid"),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: None,
            log_dir: None,
        }
    }
}

fn load<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn try_load<F, T>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = load(lookup, key, default);
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid {key} value '{raw}': {e}")))
}

fn parse_url(key: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AppError::Config(format!("Invalid {key} '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::Config(format!(
            "Invalid {key}: must use http or https, got '{other}'"
        ))),
    }
}

fn parse_base_url(key: &str, raw: &str) -> Result<Url> {
    // Url::join drops the last segment unless the path ends with a slash
    let raw = raw.trim();
    if raw.ends_with('/') {
        parse_url(key, raw)
    } else {
        parse_url(key, &format!("{raw}/"))
    }
}

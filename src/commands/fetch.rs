//! One-shot client: fetch a single entry and print it
//!
//! Runs the proxy pipeline in-process. As a client it enforces the archive date
//! range and retries transient failures, neither of which the server does.
//!
//! Usage:
//! - Latest: `apod-proxy fetch`
//! - By date: `apod-proxy fetch --date 2024-07-04`
//! - Random: `apod-proxy fetch --random`

use crate::config::Config;
use crate::constants::{FETCH_MAX_BACKOFF_MS, FETCH_MAX_RETRIES};
use crate::error::ProxyError;
use crate::services::{ApodOutcome, ApodService};
use crate::utils::{parse_feed_date, random_feed_date, today};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

pub async fn run(date: Option<String>, random: bool) {
    let date = if random {
        let picked = random_feed_date(&mut rand::rng(), today());
        eprintln!("🎲 Random date: {}", picked);
        Some(picked.format("%Y-%m-%d").to_string())
    } else {
        match date.map(|d| parse_feed_date(&d, today())).transpose() {
            Ok(date) => date.map(|d| d.format("%Y-%m-%d").to_string()),
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(2);
            }
        }
    };

    let service = match Config::from_env().and_then(|config| ApodService::from_config(&config)) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    match fetch_with_retry(&service, date.as_deref()).await {
        Ok(outcome) => match serde_json::to_string_pretty(&outcome.entry) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("❌ Failed to encode entry: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("❌ {} (HTTP {})", e.client_message(), e.status_code());
            std::process::exit(1);
        }
    }
}

/// Fetch with up to [`FETCH_MAX_RETRIES`] retries on transient failures
pub async fn fetch_with_retry(
    service: &ApodService,
    date: Option<&str>,
) -> Result<ApodOutcome, ProxyError> {
    let mut attempt = 0;
    loop {
        match service.get_entry(date).await {
            Ok(outcome) => return Ok(outcome),
            Err(e) if e.is_retryable() && attempt < FETCH_MAX_RETRIES => {
                let delay = backoff_delay(attempt);
                warn!(
                    "Fetch failed ({}), retry {}/{} in {:.1}s",
                    e,
                    attempt + 1,
                    FETCH_MAX_RETRIES,
                    delay.as_secs_f64()
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                info!("Giving up after {} attempt(s)", attempt + 1);
                return Err(e);
            }
        }
    }
}

/// `min(1s * 2^attempt, 30s)`
pub fn backoff_delay(attempt: u32) -> Duration {
    let ms = 1000u64.saturating_mul(1u64 << attempt.min(16));
    Duration::from_millis(ms.min(FETCH_MAX_BACKOFF_MS))
}

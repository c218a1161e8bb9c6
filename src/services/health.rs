use crate::services::ExtractionStatus;
use chrono::Utc;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Process-wide request counters reported by `/health`
#[derive(Debug)]
pub struct HealthStats {
    started_at: Instant,
    requests_total: AtomicU64,
    requests_failed: AtomicU64,
    extractions_attempted: AtomicU64,
    extractions_succeeded: AtomicU64,
}

pub type SharedHealthStats = Arc<HealthStats>;

/// Point-in-time view of [`HealthStats`]
#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub requests_total: u64,
    pub requests_failed: u64,
    pub extractions_attempted: u64,
    pub extractions_succeeded: u64,
    pub current_system_time: String,
}

impl Default for HealthStats {
    fn default() -> Self {
        Self {
            started_at: Instant::now(),
            requests_total: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            extractions_attempted: AtomicU64::new(0),
            extractions_succeeded: AtomicU64::new(0),
        }
    }
}

impl HealthStats {
    pub fn shared() -> SharedHealthStats {
        Arc::new(Self::default())
    }

    pub fn record_success(&self, extraction: ExtractionStatus) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        if extraction.attempted() {
            self.extractions_attempted.fetch_add(1, Ordering::Relaxed);
        }
        if extraction == ExtractionStatus::Extracted {
            self.extractions_succeeded.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_failure(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs: self.started_at.elapsed().as_secs(),
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            extractions_attempted: self.extractions_attempted.load(Ordering::Relaxed),
            extractions_succeeded: self.extractions_succeeded.load(Ordering::Relaxed),
            current_system_time: Utc::now().to_rfc3339(),
        }
    }
}

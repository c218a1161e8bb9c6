use crate::constants::FEED_START_DATE;
use crate::error::{AppError, Result};
use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// First day of the APOD feed
pub fn feed_start_date() -> NaiveDate {
    NaiveDate::parse_from_str(FEED_START_DATE, "%Y-%m-%d").unwrap_or(NaiveDate::MIN)
}

/// Today in UTC, the last day an entry can exist for
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse a `YYYY-MM-DD` date and check it lies within the feed's range
pub fn parse_feed_date(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidInput(format!("Invalid date '{}': expected YYYY-MM-DD", s)))?;

    let start = feed_start_date();
    if date < start || date > today {
        return Err(AppError::InvalidInput(format!(
            "Date {} is outside the APOD archive ({} to {})",
            date, start, today
        )));
    }
    Ok(date)
}

/// Uniformly random date between the feed start and `today`, inclusive
pub fn random_feed_date<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> NaiveDate {
    let start = feed_start_date();
    let span = (today - start).num_days().max(0);
    start + Duration::days(rng.random_range(0..=span))
}

/// JSON truthiness: `null`, `false`, `""`, `0` and `NaN` are falsy; arrays and objects are not
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Append a line to `path`, first moving a file larger than `max_bytes` to `<path>.1`
pub fn write_with_rotation(path: &Path, line: &str, max_bytes: u64) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    if let Ok(meta) = fs::metadata(path) {
        if meta.len() > max_bytes {
            let mut rotated = path.as_os_str().to_owned();
            rotated.push(".1");
            fs::rename(path, &rotated)?;
        }
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())
}

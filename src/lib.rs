//! Proxy for NASA's Astronomy Picture of the Day API
//!
//! Forwards `GET /api/apod?date=YYYY-MM-DD` to the upstream API and, when the
//! entry has no direct media URL, falls back to scraping the APOD web page.

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{AppError, ProxyError, Result};
pub use models::{ExtractedMedia, MediaEntry, MediaType};
pub use services::{ApodService, MediaExtractor};

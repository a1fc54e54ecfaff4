// src/models/mod.rs

//! Domain models for the watcher application.

mod config;
mod publication;

pub use config::{Config, CrawlerConfig, ScheduleConfig, SiteConfig, StorageConfig, TelegramConfig};
pub use publication::{MISSING_FIELD, Publication, sort_by_id};

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Board endpoints
    #[serde(default)]
    pub site: SiteConfig,

    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Polling schedule
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Registry location
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if url::Url::parse(&self.site.base_url).is_err() {
            return Err(AppError::config(format!(
                "site.base_url is not a valid URL: {}",
                self.site.base_url
            )));
        }
        if self.site.listing_path.trim().is_empty() {
            return Err(AppError::config("site.listing_path is empty"));
        }
        if self.site.attachment_endpoint.trim().is_empty() {
            return Err(AppError::config("site.attachment_endpoint is empty"));
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::config("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::config("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::config("crawler.max_concurrent must be > 0"));
        }
        if self.schedule.interval_secs == 0 {
            return Err(AppError::config("schedule.interval_secs must be > 0"));
        }
        if self.storage.db_path.trim().is_empty() {
            return Err(AppError::config("storage.db_path is empty"));
        }
        Ok(())
    }
}

/// Board endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the board; detail and attachment links resolve against it
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Listing page path and query, relative to the base URL
    #[serde(default = "defaults::listing_path")]
    pub listing_path: String,

    /// Endpoint name that marks an inline attachment trigger
    #[serde(default = "defaults::attachment_endpoint")]
    pub attachment_endpoint: String,
}

impl SiteConfig {
    /// Full URL of the listing page.
    pub fn listing_url(&self) -> String {
        crate::utils::url::join(&self.base_url, &self.listing_path)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            listing_path: defaults::listing_path(),
            attachment_endpoint: defaults::attachment_endpoint(),
        }
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between detail requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent detail requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Polling schedule settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds to wait between the end of one cycle and the next
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
        }
    }
}

/// Registry location settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the SQLite database file
    #[serde(default = "defaults::db_path")]
    pub db_path: String,
}

impl StorageConfig {
    /// Connection URL for the registry, creating the file if needed.
    pub fn db_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.db_path)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: defaults::db_path(),
        }
    }
}

/// Telegram credentials, read from the environment at startup.
///
/// These are secrets, so they never live in the config file. A missing
/// variable is a startup error; the watcher never runs a degraded
/// cycle with a disabled notifier.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token
    pub bot_token: String,

    /// Destination chat id
    pub chat_id: String,
}

impl TelegramConfig {
    /// Read credentials from `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`.
    pub fn from_env() -> Result<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| AppError::config("TELEGRAM_BOT_TOKEN is not set"))?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID")
            .map_err(|_| AppError::config("TELEGRAM_CHAT_ID is not set"))?;
        Ok(Self { bot_token, chat_id })
    }

    /// Bot API sendMessage endpoint.
    pub fn send_message_url(&self) -> String {
        format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token)
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://www.halleyweb.com/c065001/mc/".to_string()
    }

    pub fn listing_path() -> String {
        "mc_p_ricerca.php?noHeaderFooter=1&multiente=c065001".to_string()
    }

    pub fn attachment_endpoint() -> String {
        "mc_attachment.php".to_string()
    }

    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; AlboWatch/0.1; +https://github.com/albo-watch)".to_string()
    }

    pub fn timeout() -> u64 {
        10
    }

    pub fn request_delay() -> u64 {
        0
    }

    pub fn max_concurrent() -> usize {
        4
    }

    pub fn interval() -> u64 {
        1800
    }

    pub fn db_path() -> String {
        "pubblicazioni.db".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.crawler.timeout_secs, 10);
        assert_eq!(config.schedule.interval_secs, 1800);
    }

    #[test]
    fn test_listing_url_joins_base() {
        let site = SiteConfig::default();
        assert_eq!(
            site.listing_url(),
            "https://www.halleyweb.com/c065001/mc/mc_p_ricerca.php?noHeaderFooter=1&multiente=c065001"
        );
    }

    #[test]
    fn test_partial_toml_uses_section_defaults() {
        let config: Config = toml::from_str(
            r#"
            [crawler]
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.crawler.timeout_secs, 5);
        assert_eq!(config.crawler.max_concurrent, 4);
        assert_eq!(config.storage.db_path, "pubblicazioni.db");
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.crawler.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.site.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_db_url_requests_create_mode() {
        let storage = StorageConfig::default();
        assert_eq!(storage.db_url(), "sqlite://pubblicazioni.db?mode=rwc");
    }
}

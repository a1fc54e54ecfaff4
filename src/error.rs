// src/error.rs

//! Unified error handling for the watcher application.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
///
/// Variants map one-to-one onto how a failure is handled: `Network`
/// and `Delivery` on a single item are logged and skipped, `Parse` on
/// the listing page aborts the cycle, `Storage` on a lookup or insert
/// skips the item without notifying, and `Config` stops the process
/// at startup.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request for a board page failed (timeout, connection, status)
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    /// Expected markup structure is absent
    #[error("parse error: {0}")]
    Parse(String),

    /// Registry read/write failed
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Notification delivery failed
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSS selector parsing failed
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

impl AppError {
    /// Create a network error for the given URL.
    pub fn network(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Network {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Create a delivery error.
    pub fn delivery(message: impl fmt::Display) -> Self {
        Self::Delivery(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }
}

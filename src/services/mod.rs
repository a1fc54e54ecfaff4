// src/services/mod.rs

//! Service layer for the watcher application.
//!
//! - Detail page extraction (`DetailExtractor`)
//! - Listing page extraction (`ListingExtractor`)
//! - Telegram notification (`TelegramNotifier`)

mod detail;
mod listing;
mod telegram;

pub use detail::DetailExtractor;
pub use listing::{ListingExtractor, ListingOutcome};
pub use telegram::{TelegramNotifier, compose_message, escape_markdown};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Publication;
use crate::utils::Shutdown;

/// Source of the current batch of publications.
#[async_trait]
pub trait PublicationSource: Send + Sync {
    /// Extract the currently listed publications.
    async fn extract(&self, shutdown: &Shutdown) -> Result<ListingOutcome>;
}

/// Destination for alerts about new publications.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver an alert for one publication.
    async fn notify(&self, publication: &Publication) -> Result<()>;
}

// src/services/listing.rs

//! Listing page extractor.
//!
//! Walks the results table on the board's index page, resolves the
//! per-row detail link, and delegates each row to the
//! [`DetailExtractor`]. One bad row or one bad detail page never stops
//! the batch; a missing results table does, because it means the site
//! layout changed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Config, Publication};
use crate::services::detail::DetailExtractor;
use crate::services::PublicationSource;
use crate::utils::http::fetch_text;
use crate::utils::url::join;
use crate::utils::Shutdown;

/// Minimum cells for a listing row to be considered well formed.
const MIN_ROW_CELLS: usize = 5;

/// Id of the results table on the listing page.
const LISTING_TABLE_ID: &str = "table-albo";

/// Summary of one listing extraction.
#[derive(Debug, Default)]
pub struct ListingOutcome {
    /// Successfully extracted publications, in table row order
    pub publications: Vec<Publication>,
    /// Data rows seen in the table (header excluded)
    pub row_total: usize,
    /// Rows skipped for being malformed or lacking a detail link
    pub skipped_rows: usize,
    /// Detail pages that failed to fetch or extract
    pub detail_failures: usize,
}

/// Rows parsed out of the listing table before any detail fetch.
#[derive(Debug, Default)]
struct ParsedListing {
    detail_links: Vec<String>,
    row_total: usize,
    skipped_rows: usize,
}

/// Service for extracting the current batch of publications.
pub struct ListingExtractor {
    client: Client,
    config: Arc<Config>,
    detail: DetailExtractor,
    table_sel: Selector,
    row_sel: Selector,
    cell_sel: Selector,
    anchor_sel: Selector,
}

impl ListingExtractor {
    /// Create a new listing extractor sharing the given HTTP client.
    pub fn new(client: Client, config: Arc<Config>) -> Result<Self> {
        let detail = DetailExtractor::new(client.clone(), &config.site)?;
        Ok(Self {
            client,
            config,
            detail,
            table_sel: parse_selector(&format!("table#{LISTING_TABLE_ID}"))?,
            row_sel: parse_selector("tr")?,
            cell_sel: parse_selector("td")?,
            anchor_sel: parse_selector("a[href]")?,
        })
    }

    /// Fetch the listing page and extract every listed publication.
    ///
    /// Detail pages are fetched with bounded concurrency; per-item
    /// failures are logged and counted, and the shutdown token stops
    /// the remaining fetches promptly.
    pub async fn extract(&self, shutdown: &Shutdown) -> Result<ListingOutcome> {
        let listing_url = self.config.site.listing_url();
        let body = fetch_text(&self.client, &listing_url).await?;

        let parsed = {
            let document = Html::parse_document(&body);
            self.parse_rows(&document)?
        };

        if parsed.skipped_rows > 0 {
            log::warn!(
                "skipped {} of {} listing rows",
                parsed.skipped_rows,
                parsed.row_total
            );
        }

        let mut outcome = ListingOutcome {
            row_total: parsed.row_total,
            skipped_rows: parsed.skipped_rows,
            ..ListingOutcome::default()
        };

        let delay = Duration::from_millis(self.config.crawler.request_delay_ms);
        let concurrency = self.config.crawler.max_concurrent.max(1);

        let fetches = stream::iter(parsed.detail_links)
            .map(|url| {
                let detail = &self.detail;
                async move {
                    let result = detail.extract(&url).await;
                    (url, result)
                }
            })
            .buffered(concurrency)
            .take_until(shutdown.cancelled());
        futures::pin_mut!(fetches);

        while let Some((url, result)) = fetches.next().await {
            match result {
                Ok(publication) => outcome.publications.push(publication),
                Err(error) => {
                    outcome.detail_failures += 1;
                    log::warn!("failed to extract detail page {url}: {error}");
                }
            }

            if delay.as_millis() > 0 {
                tokio::time::sleep(delay).await;
            }
        }

        Ok(outcome)
    }

    /// Locate the results table and collect per-row detail links.
    fn parse_rows(&self, document: &Html) -> Result<ParsedListing> {
        let table = document.select(&self.table_sel).next().ok_or_else(|| {
            AppError::parse(format!(
                "listing table #{LISTING_TABLE_ID} not found; the site layout may have changed"
            ))
        })?;

        let mut parsed = ParsedListing::default();

        // First row is the header.
        for row in table.select(&self.row_sel).skip(1) {
            parsed.row_total += 1;

            let cells: Vec<_> = row.select(&self.cell_sel).collect();
            if cells.len() < MIN_ROW_CELLS {
                parsed.skipped_rows += 1;
                continue;
            }

            // The subject cell carries the anchor to the detail page.
            let href = cells[1]
                .select(&self.anchor_sel)
                .next()
                .and_then(|a| a.value().attr("href"));

            match href {
                Some(href) => parsed
                    .detail_links
                    .push(join(&self.config.site.base_url, href)),
                None => parsed.skipped_rows += 1,
            }
        }

        Ok(parsed)
    }
}

#[async_trait]
impl PublicationSource for ListingExtractor {
    async fn extract(&self, shutdown: &Shutdown) -> Result<ListingOutcome> {
        ListingExtractor::extract(self, shutdown).await
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

// src/pipeline/cycle.rs

//! One ingestion cycle.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::sort_by_id;
use crate::services::{AlertSink, PublicationSource};
use crate::storage::Registry;
use crate::utils::Shutdown;

/// Aggregate counts for one cycle.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Cycle start timestamp
    pub start_time: DateTime<Utc>,
    /// Cycle end timestamp
    pub end_time: DateTime<Utc>,
    /// Publications extracted from the listing
    pub discovered: usize,
    /// Publications stored for the first time
    pub new: usize,
    /// Alerts delivered
    pub notified: usize,
    /// Per-item failures (detail pages, registry, delivery)
    pub errors: usize,
}

impl CycleStats {
    /// One-line summary for the cycle log.
    pub fn summary(&self) -> String {
        format!(
            "discovered {}, new {}, notified {}, errors {} in {}s",
            self.discovered,
            self.new,
            self.notified,
            self.errors,
            (self.end_time - self.start_time).num_seconds()
        )
    }
}

/// Execute exactly one full cycle.
///
/// New records are processed in ascending id order so alerts arrive
/// in a meaningful sequence. Per item the order is fixed: novelty
/// check, durable insert, then notification — a record is never
/// announced unless its insert succeeded, and a failed delivery is
/// never rolled back.
pub async fn run_once(
    source: &dyn PublicationSource,
    registry: &dyn Registry,
    sink: &dyn AlertSink,
    shutdown: &Shutdown,
) -> Result<CycleStats> {
    let start_time = Utc::now();

    // A listing-level failure aborts the cycle; the caller retries on
    // the next interval.
    let outcome = source.extract(shutdown).await?;

    let mut stats = CycleStats {
        start_time,
        end_time: start_time,
        discovered: outcome.publications.len(),
        new: 0,
        notified: 0,
        errors: outcome.detail_failures,
    };

    let mut publications = outcome.publications;
    sort_by_id(&mut publications);

    for publication in &publications {
        if shutdown.is_cancelled() {
            log::info!("cycle interrupted by shutdown");
            break;
        }

        match registry.exists(&publication.id).await {
            Ok(true) => continue,
            Ok(false) => {}
            Err(error) => {
                // Cannot determine novelty; guessing would risk a
                // duplicate alert or a silently dropped record.
                stats.errors += 1;
                log::warn!(
                    "novelty check failed for publication {}: {error}",
                    publication.id
                );
                continue;
            }
        }

        match registry.insert_if_absent(publication).await {
            Ok(true) => stats.new += 1,
            Ok(false) => {
                // Another cycle stored it between our check and our
                // insert; that cycle owns the notification.
                log::debug!("publication {} inserted concurrently", publication.id);
                continue;
            }
            Err(error) => {
                stats.errors += 1;
                log::warn!("failed to store publication {}: {error}", publication.id);
                continue;
            }
        }

        match sink.notify(publication).await {
            Ok(()) => {
                stats.notified += 1;
                log::info!("notified new publication {}", publication.id);
            }
            Err(error) => {
                stats.errors += 1;
                log::warn!(
                    "failed to deliver alert for publication {}: {error}",
                    publication.id
                );
            }
        }
    }

    stats.end_time = Utc::now();
    Ok(stats)
}

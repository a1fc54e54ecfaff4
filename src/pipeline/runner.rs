// src/pipeline/runner.rs

//! Fixed-interval polling loop.

use std::time::Duration;

use crate::pipeline::cycle::run_once;
use crate::services::{AlertSink, PublicationSource};
use crate::storage::Registry;
use crate::utils::Shutdown;

/// Run cycles until the shutdown token fires.
///
/// The interval starts after a cycle completes, so a slow cycle never
/// overlaps the next one. A failed cycle is logged and the loop moves
/// on; only cancellation ends it.
pub async fn run_forever(
    source: &dyn PublicationSource,
    registry: &dyn Registry,
    sink: &dyn AlertSink,
    interval: Duration,
    shutdown: &Shutdown,
) {
    log::info!(
        "watching the board every {}s; stop with Ctrl-C",
        interval.as_secs()
    );

    loop {
        if shutdown.is_cancelled() {
            break;
        }

        match run_once(source, registry, sink, shutdown).await {
            Ok(stats) => log::info!("cycle complete: {}", stats.summary()),
            Err(error) => log::error!("cycle failed: {error}"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    log::info!("watcher stopped");
}

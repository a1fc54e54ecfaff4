// src/main.rs

//! albo-watch CLI.
//!
//! `run` processes the current listing once; `watch` polls at a fixed
//! interval until interrupted; `validate` checks configuration and
//! credentials without touching the network.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use albo_watch::error::Result;
use albo_watch::models::{Config, TelegramConfig};
use albo_watch::pipeline::{run_forever, run_once};
use albo_watch::services::{ListingExtractor, TelegramNotifier};
use albo_watch::storage::SqliteRegistry;
use albo_watch::utils::{http, shutdown};

/// albo-watch - municipal notice-board watcher
#[derive(Parser, Debug)]
#[command(name = "albo-watch", version, about = "Municipal notice-board watcher")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process the current listing once and exit
    Run,

    /// Poll the board at a fixed interval until interrupted
    Watch {
        /// Seconds between cycles (overrides the config file)
        #[arg(long)]
        interval_secs: Option<u64>,
    },

    /// Validate configuration and credentials
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    config.validate()?;

    if let Command::Validate = cli.command {
        // Credentials are checked too: a missing token must surface
        // here, not after the first cycle already ran.
        TelegramConfig::from_env()?;
        log::info!("configuration OK");
        return Ok(());
    }

    // Missing credentials stop the process before any cycle runs.
    let telegram = TelegramConfig::from_env()?;

    let client = http::create_client(&config.crawler)?;
    let registry = SqliteRegistry::connect(&config.storage.db_url()).await?;
    let notifier = TelegramNotifier::new(client.clone(), telegram);

    let config = Arc::new(config);
    let listing = ListingExtractor::new(client, Arc::clone(&config))?;

    let (handle, stop) = shutdown::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("shutdown signal received");
            handle.trigger();
        }
    });

    match cli.command {
        Command::Run => {
            let stats = run_once(&listing, &registry, &notifier, &stop).await?;
            log::info!("cycle complete: {}", stats.summary());
        }
        Command::Watch { interval_secs } => {
            let interval =
                Duration::from_secs(interval_secs.unwrap_or(config.schedule.interval_secs));
            run_forever(&listing, &registry, &notifier, interval, &stop).await;
        }
        Command::Validate => unreachable!("handled above"),
    }

    Ok(())
}

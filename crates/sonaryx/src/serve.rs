// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sonaryx serve` command implementation.
//!
//! Connects the Spotify catalog, SQLite storage and Discord channel, installs
//! the daily and fallback triggers, and runs until SIGINT or SIGTERM. On
//! shutdown the triggers stop first, an in-flight check gets a grace period,
//! and the database is checkpointed last.

use std::sync::Arc;
use std::time::Duration;

use sonaryx_config::model::SonaryxConfig;
use sonaryx_core::SonaryxError;
use sonaryx_cron::CheckScheduler;
use tracing::{info, warn};

use crate::adapters::Adapters;
use crate::shutdown;

/// How long shutdown waits for a running check.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the `sonaryx serve` command.
pub async fn run_serve(config: SonaryxConfig) -> Result<(), SonaryxError> {
    info!(name = %config.bot.name, "starting sonaryx serve");

    let cancel = shutdown::install_signal_handler();
    let adapters = Adapters::connect(&config).await?;
    let jobs = Arc::new(adapters.jobs(&config)?);

    let scheduler = CheckScheduler::with_cancellation(jobs, config.schedule.clone(), cancel.clone());
    let installed = scheduler.start();
    if installed.is_empty() && !config.schedule.run_on_start {
        warn!("no release checks scheduled; waiting for shutdown");
    }
    info!(triggers = installed.len(), "sonaryx is running");

    cancel.cancelled().await;

    scheduler.stop();
    scheduler.join().await;
    scheduler.drain(DRAIN_TIMEOUT).await;
    adapters.shutdown().await;

    info!("sonaryx serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sonaryx={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

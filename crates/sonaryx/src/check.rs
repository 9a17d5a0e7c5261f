// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sonaryx check` and `sonaryx fallback`: one pass, right now.

use chrono::Utc;
use sonaryx_config::model::SonaryxConfig;
use sonaryx_core::SonaryxError;
use sonaryx_release::RunKind;
use tracing::info;

use crate::adapters::Adapters;

/// Runs one pass of `kind` through the same path the scheduler uses.
pub async fn run_check(config: &SonaryxConfig, kind: RunKind) -> Result<(), SonaryxError> {
    let adapters = Adapters::connect(config).await?;
    let jobs = adapters.jobs(config)?;

    info!(run = %kind, "manual release check triggered");
    let summary = jobs.execute(kind, Utc::now()).await;
    adapters.shutdown().await;

    let summary = summary
        .ok_or_else(|| SonaryxError::Internal(format!("{kind} release check failed")))?;
    match summary.date {
        Some(date) => println!(
            "{kind} check for {date}: {} artists checked, {} new, {} missed, {} skipped",
            summary.artists_checked, summary.reported, summary.missed, summary.skipped
        ),
        None => println!("{kind} check: no subscribed artists"),
    }
    Ok(())
}

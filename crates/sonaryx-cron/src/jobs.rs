// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The two scheduled passes: the primary daily check and the fallback
//! reconciliation.
//!
//! Both passes read the subscriptions once, walk them sequentially, replace
//! the snapshot for the day they ran on and post a single report. A failed
//! snapshot write is logged and the report still goes out. Any other
//! run-level failure is posted to the channel as a failure notice.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use sonaryx_config::model::SonaryxConfig;
use sonaryx_core::date_window::DateWindow;
use sonaryx_core::{CatalogAdapter, ChannelAdapter, OutboundMessage, SonaryxError, StorageAdapter};
use sonaryx_release::report::{daily_report, failure_notice, fallback_report};
use sonaryx_release::runner::DEFAULT_PACING;
use sonaryx_release::{
    ArtistCheckRunner, Audience, FallbackReconciler, Pacer, RunKind, RunOutcome,
};
use tracing::{error, info, warn};

/// Counts from one completed pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub date: Option<NaiveDate>,
    pub artists_checked: usize,
    /// Releases reported for the run's own day.
    pub reported: usize,
    /// Releases recovered for the previous day (fallback only).
    pub missed: usize,
    pub skipped: usize,
}

/// Everything a pass needs: collaborators plus date settings.
pub struct ReleaseJobs {
    catalog: Arc<dyn CatalogAdapter>,
    storage: Arc<dyn StorageAdapter>,
    channel: Arc<dyn ChannelAdapter>,
    window: DateWindow,
    window_days: u32,
    audience: Audience,
    pacing: Duration,
}

impl ReleaseJobs {
    pub fn new(
        catalog: Arc<dyn CatalogAdapter>,
        storage: Arc<dyn StorageAdapter>,
        channel: Arc<dyn ChannelAdapter>,
        window: DateWindow,
    ) -> Self {
        Self {
            catalog,
            storage,
            channel,
            window,
            window_days: 0,
            audience: Audience::default(),
            pacing: DEFAULT_PACING,
        }
    }

    /// Build from loaded configuration.
    pub fn from_config(
        catalog: Arc<dyn CatalogAdapter>,
        storage: Arc<dyn StorageAdapter>,
        channel: Arc<dyn ChannelAdapter>,
        config: &SonaryxConfig,
    ) -> Result<Self, SonaryxError> {
        let window = DateWindow::from_name(config.schedule.timezone.trim())?;
        Ok(Self::new(catalog, storage, channel, window)
            .with_window_days(config.schedule.release_window_days)
            .with_audience(Audience::new(
                &config.discord.mention_ids,
                config.discord.mention_text.clone(),
            ))
            .with_pacing(Duration::from_millis(config.schedule.pacing_ms)))
    }

    pub fn with_window_days(mut self, days: u32) -> Self {
        self.window_days = days;
        self
    }

    pub fn with_audience(mut self, audience: Audience) -> Self {
        self.audience = audience;
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn window(&self) -> &DateWindow {
        &self.window
    }

    fn runner(&self) -> ArtistCheckRunner {
        ArtistCheckRunner::new(self.catalog.clone(), self.storage.clone()).with_pacing(self.pacing)
    }

    fn reconciler(&self) -> FallbackReconciler {
        FallbackReconciler::new(self.catalog.clone(), self.storage.clone())
            .with_pacing(self.pacing)
    }

    /// Run one pass for the day `now` falls on.
    ///
    /// Never fails: a run-level error is logged and posted as a notice.
    pub async fn execute(&self, kind: RunKind, now: DateTime<Utc>) -> Option<CheckSummary> {
        let today = self.window.today_at(now);
        let result = match kind {
            RunKind::Daily => self.daily_check(today).await,
            RunKind::Fallback => self.fallback_check(today).await,
        };
        match result {
            Ok(summary) => Some(summary),
            Err(e) => {
                error!(run = %kind, %today, error = %e, "release check failed");
                if let Err(send_err) = self.channel.send(failure_notice(kind, &e)).await {
                    warn!(run = %kind, error = %send_err, "could not post failure notice");
                }
                None
            }
        }
    }

    /// The primary pass: everything released on or after the cutoff.
    pub async fn daily_check(&self, today: NaiveDate) -> Result<CheckSummary, SonaryxError> {
        let artists = self.storage.get_subscribed_artists().await?;
        if artists.is_empty() {
            info!(%today, "no subscribed artists, nothing to check");
            return Ok(CheckSummary::default());
        }

        let cutoff = self.window.cutoff(today, self.window_days);
        info!(
            %today,
            %cutoff,
            window_days = self.window_days,
            tz = %self.window.timezone(),
            "starting daily release check"
        );

        let outcome = self.runner().run(&artists, cutoff).await;
        self.store_snapshot(today, &outcome).await;
        self.deliver(daily_report(today, &outcome.reportable, &self.audience))
            .await?;

        info!(
            %today,
            reported = outcome.reportable.len(),
            checked = outcome.artists_checked,
            skipped = outcome.skipped,
            "daily release check completed"
        );
        Ok(CheckSummary {
            date: Some(today),
            artists_checked: outcome.artists_checked,
            reported: outcome.reportable.len(),
            missed: 0,
            skipped: outcome.skipped,
        })
    }

    /// The fallback pass: recover yesterday's missed releases, then
    /// re-check today and replace today's snapshot.
    pub async fn fallback_check(&self, today: NaiveDate) -> Result<CheckSummary, SonaryxError> {
        let artists = self.storage.get_subscribed_artists().await?;
        if artists.is_empty() {
            info!(%today, "no subscribed artists for fallback check");
            return Ok(CheckSummary::default());
        }

        let yesterday = self.window.yesterday(today);
        info!(%today, %yesterday, artists = artists.len(), "starting fallback release check");

        let mut pacer = Pacer::new(self.pacing);
        let reconciled = self
            .reconciler()
            .find_missed_paced(&artists, yesterday, &mut pacer)
            .await?;
        let todays = self.runner().run_paced(&artists, today, &mut pacer).await;
        self.store_snapshot(today, &todays).await;

        self.deliver(fallback_report(
            today,
            yesterday,
            &reconciled.missed,
            &todays.reportable,
            &self.audience,
        ))
        .await?;

        info!(
            %yesterday,
            missed = reconciled.missed.len(),
            reported = todays.reportable.len(),
            "fallback release check completed"
        );
        Ok(CheckSummary {
            date: Some(today),
            artists_checked: todays.artists_checked,
            reported: todays.reportable.len(),
            missed: reconciled.missed.len(),
            skipped: reconciled.skipped + todays.skipped,
        })
    }

    async fn store_snapshot(&self, date: NaiveDate, outcome: &RunOutcome) {
        if let Err(e) = self
            .storage
            .store_daily_releases(date, &outcome.snapshot_rows())
            .await
        {
            error!(%date, error = %e, "failed to store daily snapshot");
        }
    }

    async fn deliver(&self, message: OutboundMessage) -> Result<(), SonaryxError> {
        let id = self.channel.send(message).await?;
        info!(message_id = %id.0, "report posted");
        Ok(())
    }
}

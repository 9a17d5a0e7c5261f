// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sequential per-artist release checks.
//!
//! Artists are processed strictly one at a time in subscription order, with
//! a fixed pause between successive catalog fetches. A failed fetch is
//! logged and the artist is skipped; it never aborts the run.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use sonaryx_core::{
    ArtistSubscription, CatalogAdapter, CheckResult, DailyRelease, ReleaseRef, StorageAdapter,
};
use tracing::{debug, error, info, warn};

use crate::freshness::{Freshness, classify, within_window};

/// Default pause between artist fetches.
pub const DEFAULT_PACING: Duration = Duration::from_secs(1);

/// Aggregate result of one pass over the subscriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    /// `FRESH_AND_REPORTABLE` results, in subscription order.
    pub reportable: Vec<CheckResult>,
    /// Every fetched release inside the window, fresh or not.
    pub window: Vec<CheckResult>,
    pub artists_checked: usize,
    /// Artists whose fetch failed and were skipped.
    pub skipped: usize,
}

impl RunOutcome {
    /// Snapshot rows for the run's day.
    pub fn snapshot_rows(&self) -> Vec<DailyRelease> {
        self.window.iter().map(CheckResult::to_daily_release).collect()
    }
}

/// Fixed delay between successive fetches. The first fetch is not delayed.
///
/// Passes that run back to back share one pacer so the delay also holds
/// across the boundary between them.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    started: bool,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            started: false,
        }
    }

    pub async fn wait(&mut self) {
        if self.started && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.started = true;
    }
}

/// Checks every subscribed artist's latest release against a cutoff date.
pub struct ArtistCheckRunner {
    catalog: Arc<dyn CatalogAdapter>,
    storage: Arc<dyn StorageAdapter>,
    pacing: Duration,
}

impl ArtistCheckRunner {
    pub fn new(catalog: Arc<dyn CatalogAdapter>, storage: Arc<dyn StorageAdapter>) -> Self {
        Self {
            catalog,
            storage,
            pacing: DEFAULT_PACING,
        }
    }

    /// Override the pause between artist fetches.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// Run one pass over `artists` with the given cutoff.
    ///
    /// Writes the new `last_release_id` for every artist whose latest
    /// release has a changed ID, reportable or not.
    pub async fn run(&self, artists: &[ArtistSubscription], cutoff: NaiveDate) -> RunOutcome {
        self.run_paced(artists, cutoff, &mut Pacer::new(self.pacing)).await
    }

    /// Like [`run`](Self::run), but waits on a caller-owned pacer.
    pub async fn run_paced(
        &self,
        artists: &[ArtistSubscription],
        cutoff: NaiveDate,
        pacer: &mut Pacer,
    ) -> RunOutcome {
        let mut outcome = RunOutcome::default();

        info!(artists = artists.len(), %cutoff, "checking subscribed artists");
        for artist in artists {
            pacer.wait().await;
            outcome.artists_checked += 1;

            let release = match self.catalog.get_artist_latest_release(&artist.name).await {
                Ok(Some(release)) => release,
                Ok(None) => {
                    debug!(artist = %artist.name, "no releases found");
                    continue;
                }
                Err(e) if e.is_fetch_failure() => {
                    warn!(artist = %artist.name, error = %e, "release fetch failed, skipping artist");
                    outcome.skipped += 1;
                    continue;
                }
                Err(e) => {
                    error!(artist = %artist.name, error = %e, "unexpected error checking artist, skipping");
                    outcome.skipped += 1;
                    continue;
                }
            };

            let freshness = classify(artist.last_release_id.as_deref(), &release, cutoff);
            debug!(
                artist = %artist.name,
                release_id = %release.id,
                release_date = %release.release_date,
                %freshness,
                "classified latest release"
            );

            if freshness.advances_last_release() {
                self.record_last_release(artist, &release).await;
            }

            if within_window(&release, cutoff) {
                let result = CheckResult::new(&artist.name, release);
                if freshness.is_reportable() {
                    info!(artist = %artist.name, release = %result.release.name, "new release");
                    outcome.reportable.push(result.clone());
                }
                outcome.window.push(result);
            } else if freshness == Freshness::FreshButStaleDate {
                info!(
                    artist = %artist.name,
                    release_date = %release.release_date,
                    %cutoff,
                    "new release is older than the cutoff, not reporting"
                );
            }
        }

        info!(
            checked = outcome.artists_checked,
            reportable = outcome.reportable.len(),
            skipped = outcome.skipped,
            "artist check pass complete"
        );
        outcome
    }

    /// A failed write aborts only this artist's update.
    async fn record_last_release(&self, artist: &ArtistSubscription, release: &ReleaseRef) {
        if let Err(e) = self
            .storage
            .update_artist_last_release(&artist.id, &release.id)
            .await
        {
            warn!(
                artist = %artist.name,
                release_id = %release.id,
                error = %e,
                "failed to record last release"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonaryx_test_utils::fixtures::{release, ymd};
    use sonaryx_test_utils::{MemoryStorage, MockCatalog};
    use tracing_test::traced_test;

    async fn setup(
        artists: &[(&str, &str)],
    ) -> (Arc<MockCatalog>, Arc<MemoryStorage>, ArtistCheckRunner) {
        let catalog = Arc::new(MockCatalog::new());
        let storage = Arc::new(MemoryStorage::with_artists(artists).await);
        let runner = ArtistCheckRunner::new(catalog.clone(), storage.clone())
            .with_pacing(Duration::ZERO);
        (catalog, storage, runner)
    }

    #[tokio::test]
    async fn stale_release_advances_last_id_without_reporting() {
        let (catalog, storage, runner) = setup(&[("a", "A")]).await;
        storage.set_last_release("a", "X").await;
        catalog.add_release("A", release("Y", "A", "2024-01-04"));

        let artists = storage.get_subscribed_artists().await.unwrap();
        let outcome = runner.run(&artists, ymd(2024, 1, 5)).await;

        assert!(outcome.reportable.is_empty());
        assert!(outcome.window.is_empty());
        assert_eq!(storage.last_release("a").await.as_deref(), Some("Y"));
    }

    #[tokio::test]
    async fn todays_release_is_reported_and_recorded() {
        let (catalog, storage, runner) = setup(&[("a", "A")]).await;
        storage.set_last_release("a", "X").await;
        catalog.add_release("A", release("Y", "A", "2024-01-05"));

        let artists = storage.get_subscribed_artists().await.unwrap();
        let outcome = runner.run(&artists, ymd(2024, 1, 5)).await;

        assert_eq!(outcome.reportable.len(), 1);
        assert_eq!(outcome.reportable[0].link, "https://open.spotify.com/album/Y");
        assert_eq!(storage.last_release("a").await.as_deref(), Some("Y"));
    }

    #[tokio::test]
    async fn second_pass_reports_nothing_but_keeps_window() {
        let (catalog, storage, runner) = setup(&[("a", "A"), ("b", "B")]).await;
        catalog.add_release("A", release("ra", "A", "2024-01-05"));
        catalog.add_release("B", release("rb", "B", "2024-01-05"));

        let artists = storage.get_subscribed_artists().await.unwrap();
        let first = runner.run(&artists, ymd(2024, 1, 5)).await;
        assert_eq!(first.reportable.len(), 2);

        let artists = storage.get_subscribed_artists().await.unwrap();
        let second = runner.run(&artists, ymd(2024, 1, 5)).await;
        assert!(second.reportable.is_empty());
        assert_eq!(second.window.len(), 2);
        assert_eq!(second.snapshot_rows()[0].release_id, first.window[0].release.id);
    }

    #[tokio::test]
    async fn fetch_failures_skip_only_that_artist() {
        let (catalog, storage, runner) = setup(&[("a", "A"), ("b", "Broken"), ("c", "C")]).await;
        catalog.add_release("A", release("ra", "A", "2024-01-05"));
        catalog.fail_artist("Broken");
        catalog.add_release("C", release("rc", "C", "2024-01-05"));

        let artists = storage.get_subscribed_artists().await.unwrap();
        let outcome = runner.run(&artists, ymd(2024, 1, 5)).await;

        // Newest subscription first: C, Broken, A.
        let names: Vec<&str> = outcome.reportable.iter().map(|r| r.artist.as_str()).collect();
        assert_eq!(names, vec!["C", "A"]);
        assert_eq!(outcome.artists_checked, 3);
        assert_eq!(outcome.skipped, 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn unknown_artist_is_logged_and_skipped() {
        let (_catalog, storage, runner) = setup(&[("a", "Ghost")]).await;
        let artists = storage.get_subscribed_artists().await.unwrap();
        let outcome = runner.run(&artists, ymd(2024, 1, 5)).await;
        assert_eq!(outcome.skipped, 1);
        assert!(outcome.reportable.is_empty());
        assert!(logs_contain("release fetch failed, skipping artist"));
    }

    #[tokio::test]
    async fn failed_update_still_reports_the_release() {
        let (catalog, storage, runner) = setup(&[("a", "A")]).await;
        storage.fail_updates_for("a").await;
        catalog.add_release("A", release("Y", "A", "2024-01-05"));

        let artists = storage.get_subscribed_artists().await.unwrap();
        let outcome = runner.run(&artists, ymd(2024, 1, 5)).await;

        assert_eq!(outcome.reportable.len(), 1);
        assert!(storage.last_release("a").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn pacing_applies_between_artists_only() {
        let catalog = Arc::new(MockCatalog::new());
        let storage =
            Arc::new(MemoryStorage::with_artists(&[("a", "A"), ("b", "B"), ("c", "C")]).await);
        for name in ["A", "B", "C"] {
            catalog.add_artist(&format!("id-{name}"), name);
        }
        let runner = ArtistCheckRunner::new(catalog.clone(), storage.clone());

        let artists = storage.get_subscribed_artists().await.unwrap();
        let started = tokio::time::Instant::now();
        runner.run(&artists, ymd(2024, 1, 5)).await;

        let elapsed = started.elapsed();
        assert!(elapsed >= DEFAULT_PACING * 2, "elapsed {elapsed:?}");
        assert!(elapsed < DEFAULT_PACING * 3, "elapsed {elapsed:?}");
    }
}

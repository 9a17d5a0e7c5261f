// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Finds releases for a past day that the primary pass did not record.
//!
//! The stored snapshot for the target day is read once. Every subscribed
//! artist's releases for that exact day are fetched, and the first one whose
//! ID is missing from the snapshot is reported. The snapshot itself is left
//! untouched.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use sonaryx_core::{ArtistSubscription, CatalogAdapter, CheckResult, SonaryxError, StorageAdapter};
use tracing::{debug, info, warn};

use crate::runner::{DEFAULT_PACING, Pacer};

/// Missed releases for one target day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// At most one per artist, in subscription order.
    pub missed: Vec<CheckResult>,
    pub artists_checked: usize,
    pub skipped: usize,
}

pub struct FallbackReconciler {
    catalog: Arc<dyn CatalogAdapter>,
    storage: Arc<dyn StorageAdapter>,
    pacing: Duration,
}

impl FallbackReconciler {
    pub fn new(catalog: Arc<dyn CatalogAdapter>, storage: Arc<dyn StorageAdapter>) -> Self {
        Self {
            catalog,
            storage,
            pacing: DEFAULT_PACING,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Compare the snapshot for `date` against fresh catalog data.
    ///
    /// Only the snapshot read can fail the pass; catalog errors skip the
    /// artist.
    pub async fn find_missed(
        &self,
        artists: &[ArtistSubscription],
        date: NaiveDate,
    ) -> Result<ReconcileOutcome, SonaryxError> {
        self.find_missed_paced(artists, date, &mut Pacer::new(self.pacing)).await
    }

    /// Like [`find_missed`](Self::find_missed), but waits on a caller-owned pacer.
    pub async fn find_missed_paced(
        &self,
        artists: &[ArtistSubscription],
        date: NaiveDate,
        pacer: &mut Pacer,
    ) -> Result<ReconcileOutcome, SonaryxError> {
        let stored: HashSet<String> = self
            .storage
            .get_stored_release_ids(date)
            .await?
            .into_iter()
            .collect();
        info!(%date, stored = stored.len(), artists = artists.len(), "reconciling stored releases");

        let mut outcome = ReconcileOutcome::default();

        for artist in artists {
            pacer.wait().await;
            outcome.artists_checked += 1;

            let releases = match self
                .catalog
                .get_artist_releases_for_date(&artist.name, date)
                .await
            {
                Ok(releases) => releases,
                Err(e) => {
                    warn!(artist = %artist.name, %date, error = %e, "release fetch failed, skipping artist");
                    outcome.skipped += 1;
                    continue;
                }
            };

            match releases.into_iter().find(|r| !stored.contains(&r.id)) {
                Some(release) => {
                    info!(artist = %artist.name, release_id = %release.id, %date, "missed release");
                    outcome.missed.push(CheckResult::new(&artist.name, release));
                }
                None => debug!(artist = %artist.name, %date, "no missed releases"),
            }
        }

        Ok(outcome)
    }
}

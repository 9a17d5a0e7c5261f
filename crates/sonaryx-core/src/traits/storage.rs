// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for subscription and snapshot persistence.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::SonaryxError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ArtistSubscription, DailyRelease};

/// Adapter for persistence backends.
///
/// Owns the subscription records and one release snapshot per calendar date.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), SonaryxError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), SonaryxError>;

    // --- Subscriptions ---

    /// Subscribes to an artist, or renames an existing subscription.
    async fn subscribe_artist(
        &self,
        id: &str,
        name: &str,
    ) -> Result<ArtistSubscription, SonaryxError>;

    /// Removes a subscription, returning it if it existed.
    async fn unsubscribe_artist(
        &self,
        id: &str,
    ) -> Result<Option<ArtistSubscription>, SonaryxError>;

    /// Whether a subscription with this ID exists.
    async fn is_artist_subscribed(&self, id: &str) -> Result<bool, SonaryxError>;

    /// All subscriptions, newest first.
    async fn get_subscribed_artists(&self) -> Result<Vec<ArtistSubscription>, SonaryxError>;

    /// Records the last release classified as fresh for an artist.
    async fn update_artist_last_release(
        &self,
        artist_id: &str,
        release_id: &str,
    ) -> Result<(), SonaryxError>;

    // --- Daily snapshots ---

    /// Replaces the snapshot for `date` with `releases` (delete, then insert).
    async fn store_daily_releases(
        &self,
        date: NaiveDate,
        releases: &[DailyRelease],
    ) -> Result<(), SonaryxError>;

    /// The snapshot rows for `date` in insertion order.
    async fn get_daily_releases(&self, date: NaiveDate)
    -> Result<Vec<DailyRelease>, SonaryxError>;

    /// Release IDs recorded in the snapshot for `date`.
    async fn get_stored_release_ids(&self, date: NaiveDate) -> Result<Vec<String>, SonaryxError>;
}

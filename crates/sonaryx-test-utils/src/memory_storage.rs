// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory storage adapter for deterministic testing.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use sonaryx_core::{
    AdapterType, ArtistSubscription, DailyRelease, HealthStatus, PluginAdapter, SonaryxError,
    StorageAdapter,
};

#[derive(Default)]
struct State {
    /// Insertion order; listing reverses it.
    artists: Vec<ArtistSubscription>,
    snapshots: BTreeMap<NaiveDate, Vec<DailyRelease>>,
    failing_updates: HashSet<String>,
    failing_listing: bool,
    failing_snapshots: bool,
    snapshot_writes: usize,
}

/// Keeps subscriptions and snapshots in memory.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<State>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe several artists at once, oldest first.
    pub async fn with_artists(artists: &[(&str, &str)]) -> Self {
        let storage = Self::new();
        for (id, name) in artists {
            // Infallible for the in-memory store.
            let _ = storage.subscribe_artist(id, name).await;
        }
        storage
    }

    /// Set an artist's last release directly.
    pub async fn set_last_release(&self, artist_id: &str, release_id: &str) {
        let mut state = self.state.lock().await;
        if let Some(a) = state.artists.iter_mut().find(|a| a.id == artist_id) {
            a.last_release_id = Some(release_id.to_string());
        }
    }

    /// Make `update_artist_last_release` fail for this artist.
    pub async fn fail_updates_for(&self, artist_id: &str) {
        self.state
            .lock()
            .await
            .failing_updates
            .insert(artist_id.to_string());
    }

    /// Make `get_subscribed_artists` fail.
    pub async fn fail_listing(&self, failing: bool) {
        self.state.lock().await.failing_listing = failing;
    }

    /// Make `store_daily_releases` fail.
    pub async fn fail_snapshots(&self, failing: bool) {
        self.state.lock().await.failing_snapshots = failing;
    }

    /// The stored last release for an artist.
    pub async fn last_release(&self, artist_id: &str) -> Option<String> {
        self.state
            .lock()
            .await
            .artists
            .iter()
            .find(|a| a.id == artist_id)
            .and_then(|a| a.last_release_id.clone())
    }

    /// Number of snapshot replacements performed.
    pub async fn snapshot_writes(&self) -> usize {
        self.state.lock().await.snapshot_writes
    }
}

#[async_trait]
impl PluginAdapter for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, SonaryxError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SonaryxError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn initialize(&self) -> Result<(), SonaryxError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), SonaryxError> {
        Ok(())
    }

    async fn subscribe_artist(
        &self,
        id: &str,
        name: &str,
    ) -> Result<ArtistSubscription, SonaryxError> {
        let mut state = self.state.lock().await;
        if let Some(existing) = state.artists.iter_mut().find(|a| a.id == id) {
            existing.name = name.to_string();
            return Ok(existing.clone());
        }
        let sub = ArtistSubscription::new(id, name);
        state.artists.push(sub.clone());
        Ok(sub)
    }

    async fn unsubscribe_artist(
        &self,
        id: &str,
    ) -> Result<Option<ArtistSubscription>, SonaryxError> {
        let mut state = self.state.lock().await;
        let pos = state.artists.iter().position(|a| a.id == id);
        Ok(pos.map(|i| state.artists.remove(i)))
    }

    async fn is_artist_subscribed(&self, id: &str) -> Result<bool, SonaryxError> {
        Ok(self.state.lock().await.artists.iter().any(|a| a.id == id))
    }

    async fn get_subscribed_artists(&self) -> Result<Vec<ArtistSubscription>, SonaryxError> {
        let state = self.state.lock().await;
        if state.failing_listing {
            return Err(SonaryxError::Storage {
                source: "subscription listing failed".into(),
            });
        }
        Ok(state.artists.iter().rev().cloned().collect())
    }

    async fn update_artist_last_release(
        &self,
        artist_id: &str,
        release_id: &str,
    ) -> Result<(), SonaryxError> {
        let mut state = self.state.lock().await;
        if state.failing_updates.contains(artist_id) {
            return Err(SonaryxError::Storage {
                source: format!("update failed for {artist_id}").into(),
            });
        }
        match state.artists.iter_mut().find(|a| a.id == artist_id) {
            Some(a) => {
                a.last_release_id = Some(release_id.to_string());
                Ok(())
            }
            None => Err(SonaryxError::Storage {
                source: "no subscription with that artist id".into(),
            }),
        }
    }

    async fn store_daily_releases(
        &self,
        date: NaiveDate,
        releases: &[DailyRelease],
    ) -> Result<(), SonaryxError> {
        let mut state = self.state.lock().await;
        if state.failing_snapshots {
            return Err(SonaryxError::Storage {
                source: format!("snapshot write failed for {date}").into(),
            });
        }
        state.snapshot_writes += 1;
        state.snapshots.insert(date, releases.to_vec());
        Ok(())
    }

    async fn get_daily_releases(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<DailyRelease>, SonaryxError> {
        Ok(self
            .state
            .lock()
            .await
            .snapshots
            .get(&date)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_stored_release_ids(&self, date: NaiveDate) -> Result<Vec<String>, SonaryxError> {
        Ok(self
            .get_daily_releases(date)
            .await?
            .into_iter()
            .map(|r| r.release_id)
            .collect())
    }
}

// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock catalog adapter for deterministic testing.
//!
//! `MockCatalog` serves releases registered per artist name. Artists can be
//! made to fail, and an optional gate holds every lookup until the test
//! opens it, which lets scheduler tests keep a run in flight.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::{Notify, Semaphore};

use sonaryx_core::date_window::normalize;
use sonaryx_core::{
    AdapterType, ArtistRef, CatalogAdapter, HealthStatus, PluginAdapter, ReleaseRef, SonaryxError,
};

#[derive(Default)]
struct Artist {
    id: String,
    releases: Vec<ReleaseRef>,
}

#[derive(Default)]
struct State {
    artists: HashMap<String, Artist>,
    failing: HashSet<String>,
    calls: Vec<String>,
}

/// A scripted catalog.
pub struct MockCatalog {
    state: Mutex<State>,
    gate: Mutex<Option<Arc<Semaphore>>>,
    entered: Arc<Notify>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            gate: Mutex::new(None),
            entered: Arc::new(Notify::new()),
        }
    }

    /// Register an artist with no releases.
    pub fn add_artist(&self, id: &str, name: &str) {
        let mut state = self.lock();
        state.artists.entry(name.to_string()).or_default().id = id.to_string();
    }

    /// Register a release for `name`, creating the artist if needed.
    pub fn add_release(&self, name: &str, release: ReleaseRef) {
        let mut state = self.lock();
        let artist = state
            .artists
            .entry(name.to_string())
            .or_insert_with(|| Artist {
                id: format!("id-{}", name.to_lowercase()),
                releases: Vec::new(),
            });
        artist.releases.push(release);
    }

    /// Every lookup for `name` fails with a catalog error.
    pub fn fail_artist(&self, name: &str) {
        self.lock().failing.insert(name.to_string());
    }

    /// Close the gate. Lookups wait until a permit is added to the
    /// returned semaphore.
    pub fn hold(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.gate.lock().unwrap_or_else(|e| e.into_inner()) = Some(gate.clone());
        gate
    }

    /// Notified each time a lookup starts.
    pub fn entered(&self) -> Arc<Notify> {
        self.entered.clone()
    }

    /// Lookups made so far, as `latest:<name>` or `date:<name>:<date>`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn enter(&self, call: String) {
        self.lock().calls.push(call);
        self.entered.notify_one();
        let gate = self.gate.lock().unwrap_or_else(|e| e.into_inner()).clone();
        if let Some(gate) = gate {
            // Dropping the permit reopens the gate for the next lookup.
            let _permit = gate.acquire().await;
        }
    }

    fn releases_of(&self, name: &str) -> Result<Vec<ReleaseRef>, SonaryxError> {
        let state = self.lock();
        if state.failing.contains(name) {
            return Err(SonaryxError::catalog(format!("mock failure for {name}")));
        }
        state
            .artists
            .get(name)
            .map(|a| a.releases.clone())
            .ok_or_else(|| SonaryxError::ArtistNotFound {
                name: name.to_string(),
            })
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockCatalog {
    fn name(&self) -> &str {
        "mock-catalog"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Catalog
    }

    async fn health_check(&self) -> Result<HealthStatus, SonaryxError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SonaryxError> {
        Ok(())
    }
}

#[async_trait]
impl CatalogAdapter for MockCatalog {
    async fn search_artist(&self, name: &str) -> Result<Option<ArtistRef>, SonaryxError> {
        let state = self.lock();
        let wanted = name.to_lowercase();
        Ok(state
            .artists
            .iter()
            .find(|(n, _)| n.to_lowercase() == wanted)
            .map(|(n, a)| ArtistRef {
                id: a.id.clone(),
                name: n.clone(),
                genres: Vec::new(),
                external_link: None,
            }))
    }

    async fn get_artist_by_id(&self, id: &str) -> Result<Option<ArtistRef>, SonaryxError> {
        let state = self.lock();
        Ok(state
            .artists
            .iter()
            .find(|(_, a)| a.id == id)
            .map(|(n, a)| ArtistRef {
                id: a.id.clone(),
                name: n.clone(),
                genres: Vec::new(),
                external_link: None,
            }))
    }

    async fn get_artist_latest_release(
        &self,
        artist_name: &str,
    ) -> Result<Option<ReleaseRef>, SonaryxError> {
        self.enter(format!("latest:{artist_name}")).await;
        let mut releases = self.releases_of(artist_name)?;
        // Newest first; unparseable dates sort last.
        releases.sort_by_key(|r| std::cmp::Reverse(normalize(&r.release_date).ok()));
        Ok(releases.into_iter().next())
    }

    async fn get_artist_releases_for_date(
        &self,
        artist_name: &str,
        date: NaiveDate,
    ) -> Result<Vec<ReleaseRef>, SonaryxError> {
        self.enter(format!("date:{artist_name}:{date}")).await;
        Ok(self
            .releases_of(artist_name)?
            .into_iter()
            .filter(|r| normalize(&r.release_date).ok() == Some(date))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{release, ymd};

    #[tokio::test]
    async fn latest_release_is_the_newest_by_normalized_date() {
        let catalog = MockCatalog::new();
        catalog.add_release("IVE", release("old", "IVE", "2023"));
        catalog.add_release("IVE", release("new", "IVE", "2024-02-01"));
        catalog.add_release("IVE", release("mid", "IVE", "2024-01"));

        let latest = catalog.get_artist_latest_release("IVE").await.unwrap();
        assert_eq!(latest.unwrap().id, "new");
    }

    #[tokio::test]
    async fn unknown_and_failing_artists() {
        let catalog = MockCatalog::new();
        catalog.add_artist("a1", "Quiet");
        catalog.fail_artist("Broken");

        assert!(catalog.get_artist_latest_release("Quiet").await.unwrap().is_none());
        assert!(matches!(
            catalog.get_artist_latest_release("Nobody").await,
            Err(SonaryxError::ArtistNotFound { .. })
        ));
        assert!(matches!(
            catalog.get_artist_latest_release("Broken").await,
            Err(SonaryxError::Catalog { .. })
        ));
    }

    #[tokio::test]
    async fn releases_for_date_match_normalized_dates() {
        let catalog = MockCatalog::new();
        catalog.add_release("IVE", release("a", "IVE", "2024-01-05"));
        catalog.add_release("IVE", release("b", "IVE", "2024-01"));
        catalog.add_release("IVE", release("c", "IVE", "2024-01-06"));

        let ids: Vec<String> = catalog
            .get_artist_releases_for_date("IVE", ymd(2024, 1, 1))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["b"]);
        assert_eq!(catalog.calls(), vec!["date:IVE:2024-01-01"]);
    }

    #[tokio::test]
    async fn gate_holds_lookups_until_opened() {
        let catalog = Arc::new(MockCatalog::new());
        catalog.add_artist("a1", "IVE");
        let gate = catalog.hold();
        let entered = catalog.entered();

        let task = {
            let catalog = catalog.clone();
            tokio::spawn(async move { catalog.get_artist_latest_release("IVE").await })
        };
        entered.notified().await;
        assert!(!task.is_finished());

        gate.add_permits(1);
        assert!(task.await.unwrap().unwrap().is_none());
    }
}

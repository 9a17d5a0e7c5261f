// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::OnceCell;
use tracing::debug;

use sonaryx_config::model::StorageConfig;
use sonaryx_core::{
    AdapterType, ArtistSubscription, DailyRelease, HealthStatus, PluginAdapter, SonaryxError,
    StorageAdapter,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// The database is opened lazily by [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, SonaryxError> {
        self.db.get().ok_or_else(|| SonaryxError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, SonaryxError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SonaryxError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: storage flushed");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), SonaryxError> {
        let path = self.config.database_path.clone();
        let db = Database::open_with(&path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| SonaryxError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), SonaryxError> {
        self.db()?.close().await
    }

    async fn subscribe_artist(
        &self,
        id: &str,
        name: &str,
    ) -> Result<ArtistSubscription, SonaryxError> {
        queries::artists::upsert_artist(self.db()?, id, name).await
    }

    async fn unsubscribe_artist(
        &self,
        id: &str,
    ) -> Result<Option<ArtistSubscription>, SonaryxError> {
        queries::artists::delete_artist(self.db()?, id).await
    }

    async fn is_artist_subscribed(&self, id: &str) -> Result<bool, SonaryxError> {
        Ok(queries::artists::get_artist(self.db()?, id).await?.is_some())
    }

    async fn get_subscribed_artists(&self) -> Result<Vec<ArtistSubscription>, SonaryxError> {
        queries::artists::list_artists(self.db()?).await
    }

    async fn update_artist_last_release(
        &self,
        artist_id: &str,
        release_id: &str,
    ) -> Result<(), SonaryxError> {
        queries::artists::update_last_release(self.db()?, artist_id, release_id).await
    }

    async fn store_daily_releases(
        &self,
        date: NaiveDate,
        releases: &[DailyRelease],
    ) -> Result<(), SonaryxError> {
        queries::daily_releases::replace_for_date(self.db()?, date, releases).await
    }

    async fn get_daily_releases(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<DailyRelease>, SonaryxError> {
        queries::daily_releases::list_for_date(self.db()?, date).await
    }

    async fn get_stored_release_ids(&self, date: NaiveDate) -> Result<Vec<String>, SonaryxError> {
        queries::daily_releases::release_ids_for_date(self.db()?, date).await
    }
}

// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction of the concrete adapters from configuration.

use std::sync::Arc;

use sonaryx_config::model::SonaryxConfig;
use sonaryx_core::{ChannelAdapter, PluginAdapter, SonaryxError, StorageAdapter};
use sonaryx_cron::ReleaseJobs;
use sonaryx_discord::DiscordChannel;
use sonaryx_spotify::SpotifyCatalog;
use sonaryx_storage::SqliteStorage;
use tracing::{info, warn};

/// The adapters a release check runs against.
pub struct Adapters {
    pub catalog: Arc<SpotifyCatalog>,
    pub storage: Arc<SqliteStorage>,
    pub channel: Arc<DiscordChannel>,
}

impl Adapters {
    /// Open storage, build the catalog and log in to Discord.
    pub async fn connect(config: &SonaryxConfig) -> Result<Self, SonaryxError> {
        let catalog = Arc::new(SpotifyCatalog::new(&config.spotify)?);
        let mut channel = DiscordChannel::new(&config.discord)?;
        channel.connect().await?;
        let storage = open_storage(config).await?;

        Ok(Self {
            catalog,
            storage,
            channel: Arc::new(channel),
        })
    }

    pub fn jobs(&self, config: &SonaryxConfig) -> Result<ReleaseJobs, SonaryxError> {
        ReleaseJobs::from_config(
            self.catalog.clone(),
            self.storage.clone(),
            self.channel.clone(),
            config,
        )
    }

    /// Shut everything down, checkpointing the database last.
    pub async fn shutdown(&self) {
        for adapter in [
            self.channel.as_ref() as &dyn PluginAdapter,
            self.catalog.as_ref() as &dyn PluginAdapter,
        ] {
            if let Err(e) = adapter.shutdown().await {
                warn!(adapter = adapter.name(), error = %e, "adapter shutdown failed");
            }
        }
        if let Err(e) = self.storage.close().await {
            warn!(error = %e, "storage close failed");
        }
    }
}

/// Open and migrate the SQLite database.
pub async fn open_storage(config: &SonaryxConfig) -> Result<Arc<SqliteStorage>, SonaryxError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage ready");
    Ok(Arc::new(storage))
}

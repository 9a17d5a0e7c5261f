// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sonaryx artist add|remove|list`.

use sonaryx_config::model::SonaryxConfig;
use sonaryx_core::{
    ArtistRef, ArtistSubscription, CatalogAdapter, SonaryxError, StorageAdapter,
};
use sonaryx_spotify::SpotifyCatalog;
use tracing::info;

use crate::adapters::open_storage;

/// Spotify IDs are 22 base-62 characters.
fn looks_like_spotify_id(query: &str) -> bool {
    query.len() == 22 && query.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Resolve `query` as an ID first when it looks like one, then by name.
pub async fn resolve_artist(
    catalog: &dyn CatalogAdapter,
    query: &str,
) -> Result<ArtistRef, SonaryxError> {
    let query = query.trim();
    if looks_like_spotify_id(query) {
        if let Some(artist) = catalog.get_artist_by_id(query).await? {
            return Ok(artist);
        }
    }
    catalog
        .search_artist(query)
        .await?
        .ok_or_else(|| SonaryxError::ArtistNotFound {
            name: query.to_string(),
        })
}

/// Subscribe to the artist matching `query`. Returns the line to print.
pub async fn add_artist(
    catalog: &dyn CatalogAdapter,
    storage: &dyn StorageAdapter,
    query: &str,
) -> Result<String, SonaryxError> {
    let artist = resolve_artist(catalog, query).await?;
    let existed = storage.is_artist_subscribed(&artist.id).await?;
    let sub = storage.subscribe_artist(&artist.id, &artist.name).await?;
    info!(artist = %sub.name, id = %sub.id, existed, "artist subscription saved");

    Ok(if existed {
        format!("Already subscribed to {} ({})", sub.name, sub.id)
    } else {
        format!("Subscribed to {} ({})", sub.name, sub.id)
    })
}

pub async fn remove_artist(storage: &dyn StorageAdapter, id: &str) -> Result<String, SonaryxError> {
    Ok(match storage.unsubscribe_artist(id.trim()).await? {
        Some(sub) => format!("Unsubscribed from {} ({})", sub.name, sub.id),
        None => format!("No subscription with id {}", id.trim()),
    })
}

pub fn format_subscriptions(artists: &[ArtistSubscription]) -> String {
    if artists.is_empty() {
        return "No artists subscribed.".to_string();
    }
    let mut lines = vec![format!("Subscribed artists ({}):", artists.len())];
    lines.extend(artists.iter().map(|a| {
        format!(
            "  {} ({}) last release: {}",
            a.name,
            a.id,
            a.last_release_id.as_deref().unwrap_or("none")
        )
    }));
    lines.join("\n")
}

pub async fn run_add(config: &SonaryxConfig, query: &str) -> Result<(), SonaryxError> {
    let catalog = SpotifyCatalog::new(&config.spotify)?;
    let storage = open_storage(config).await?;
    let result = add_artist(&catalog, storage.as_ref(), query).await;
    storage.close().await?;
    println!("{}", result?);
    Ok(())
}

pub async fn run_remove(config: &SonaryxConfig, id: &str) -> Result<(), SonaryxError> {
    let storage = open_storage(config).await?;
    let result = remove_artist(storage.as_ref(), id).await;
    storage.close().await?;
    println!("{}", result?);
    Ok(())
}

pub async fn run_list(config: &SonaryxConfig) -> Result<(), SonaryxError> {
    let storage = open_storage(config).await?;
    let artists = storage.get_subscribed_artists().await;
    storage.close().await?;
    println!("{}", format_subscriptions(&artists?));
    Ok(())
}

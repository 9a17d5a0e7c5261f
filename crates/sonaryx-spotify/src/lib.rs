// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spotify catalog adapter for the Sonaryx release bot.
//!
//! This crate implements [`CatalogAdapter`] on top of the Spotify Web API
//! using the client-credentials flow. Raw payloads are converted into core
//! types at this boundary and never leave the crate.

pub mod auth;
pub mod client;
pub mod types;

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::NaiveDate;
use sonaryx_config::model::SpotifyConfig;
use sonaryx_core::date_window::normalize;
use sonaryx_core::{
    AdapterType, ArtistRef, CatalogAdapter, HealthStatus, PluginAdapter, ReleaseRef, SonaryxError,
};
use tracing::{debug, info};

use crate::client::SpotifyClient;
use crate::types::{ApiAlbum, ApiArtist};

/// Spotify catalog implementing [`CatalogAdapter`].
pub struct SpotifyCatalog {
    client: SpotifyClient,
    market: String,
}

impl SpotifyCatalog {
    /// Creates the adapter. Both client credentials must be configured.
    pub fn new(config: &SpotifyConfig) -> Result<Self, SonaryxError> {
        let client_id = required(&config.client_id, "spotify.client_id")?;
        let client_secret = required(&config.client_secret, "spotify.client_secret")?;
        let client = SpotifyClient::new(client_id, client_secret)?;
        info!(market = %config.market, "Spotify catalog initialized");
        Ok(Self {
            client,
            market: config.market.clone(),
        })
    }

    #[cfg(test)]
    fn with_client(client: SpotifyClient, market: &str) -> Self {
        Self {
            client,
            market: market.to_string(),
        }
    }

    async fn find_artist(&self, name: &str) -> Result<ApiArtist, SonaryxError> {
        self.client
            .search_artists(name, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SonaryxError::ArtistNotFound {
                name: name.to_string(),
            })
    }
}

fn required(value: &Option<String>, key: &str) -> Result<String, SonaryxError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SonaryxError::Config(format!("`{key}` is required for the Spotify catalog")))
}

/// Newest first by normalized release date. Unreadable dates sort last.
fn sort_newest_first(albums: &mut [ApiAlbum]) {
    albums.sort_by_key(|a| Reverse(normalize(&a.release_date).ok()));
}

#[async_trait]
impl PluginAdapter for SpotifyCatalog {
    fn name(&self) -> &str {
        "spotify"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Catalog
    }

    async fn health_check(&self) -> Result<HealthStatus, SonaryxError> {
        match self.client.access_token().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), SonaryxError> {
        Ok(())
    }
}

#[async_trait]
impl CatalogAdapter for SpotifyCatalog {
    async fn search_artist(&self, name: &str) -> Result<Option<ArtistRef>, SonaryxError> {
        Ok(self
            .client
            .search_artists(name, 1)
            .await?
            .into_iter()
            .next()
            .map(ArtistRef::from))
    }

    async fn get_artist_by_id(&self, id: &str) -> Result<Option<ArtistRef>, SonaryxError> {
        Ok(self.client.artist(id).await?.map(ArtistRef::from))
    }

    async fn get_artist_latest_release(
        &self,
        artist_name: &str,
    ) -> Result<Option<ReleaseRef>, SonaryxError> {
        let artist = self.find_artist(artist_name).await?;
        debug!(artist = %artist.name, id = %artist.id, "resolved artist");

        let mut albums = self.client.artist_albums(&artist.id, &self.market).await?;
        sort_newest_first(&mut albums);
        let Some(latest) = albums.into_iter().next() else {
            debug!(artist = %artist.name, "artist has no releases");
            return Ok(None);
        };

        // The listing omits some fields; fall back to it if the detail is gone.
        let detail = self.client.album(&latest.id).await?.unwrap_or(latest);
        debug!(release = %detail.name, release_date = %detail.release_date, "latest release");
        Ok(Some(detail.into()))
    }

    async fn get_artist_releases_for_date(
        &self,
        artist_name: &str,
        date: NaiveDate,
    ) -> Result<Vec<ReleaseRef>, SonaryxError> {
        let artist = self.find_artist(artist_name).await?;
        let mut albums = self.client.artist_albums(&artist.id, &self.market).await?;
        sort_newest_first(&mut albums);
        Ok(albums
            .into_iter()
            .filter(|a| normalize(&a.release_date).ok() == Some(date))
            .map(ReleaseRef::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with_catalog() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok", "token_type": "Bearer", "expires_in": 3600
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "artists": {"items": [{"id": "ive", "name": "IVE", "genres": ["k-pop"]}]}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/artists/ive/albums"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {"id": "old", "name": "Eleven", "release_date": "2021-12-01", "album_type": "single"},
                    {"id": "year", "name": "Archive", "release_date": "2024", "album_type": "compilation"},
                    {"id": "new", "name": "Switch", "release_date": "2024-04-29", "album_type": "album"},
                    {"id": "same", "name": "Switch (Inst.)", "release_date": "2024-04-29", "album_type": "single"}
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/albums/new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "new", "name": "Switch", "release_date": "2024-04-29",
                "album_type": "album", "total_tracks": 6,
                "artists": [{"name": "IVE"}],
                "external_urls": {"spotify": "https://open.spotify.com/album/new"}
            })))
            .mount(&server)
            .await;
        server
    }

    fn catalog(server: &MockServer) -> SpotifyCatalog {
        let client = SpotifyClient::new("cid".into(), "secret".into())
            .unwrap()
            .with_base_url(server.uri());
        SpotifyCatalog::with_client(client, "US")
    }

    #[tokio::test]
    async fn latest_release_is_newest_album_detail() {
        let server = server_with_catalog().await;
        let latest = catalog(&server)
            .get_artist_latest_release("IVE")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, "new");
        assert_eq!(latest.total_tracks, 6);
        assert_eq!(latest.external_link, "https://open.spotify.com/album/new");
    }

    #[tokio::test]
    async fn releases_for_date_match_normalized_date() {
        let server = server_with_catalog().await;
        let catalog = catalog(&server);

        let on_day = catalog
            .get_artist_releases_for_date("IVE", NaiveDate::from_ymd_opt(2024, 4, 29).unwrap())
            .await
            .unwrap();
        let ids: Vec<&str> = on_day.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "same"]);

        let new_year = catalog
            .get_artist_releases_for_date("IVE", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(new_year[0].id, "year");
    }

    #[tokio::test]
    async fn unknown_artist_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok", "expires_in": 3600
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"artists": {"items": []}})),
            )
            .mount(&server)
            .await;

        let catalog = catalog(&server);
        assert!(catalog.search_artist("Nobody").await.unwrap().is_none());
        assert!(matches!(
            catalog.get_artist_latest_release("Nobody").await,
            Err(SonaryxError::ArtistNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn search_result_converts_to_artist_ref() {
        let server = server_with_catalog().await;
        let artist = catalog(&server).search_artist("ive").await.unwrap().unwrap();
        assert_eq!(artist.id, "ive");
        assert_eq!(artist.genres, vec!["k-pop"]);
    }

    #[test]
    fn missing_credentials_are_a_config_error() {
        let err = SpotifyCatalog::new(&SpotifyConfig::default()).err().unwrap();
        assert!(matches!(err, SonaryxError::Config(_)));
        assert!(err.to_string().contains("spotify.client_id"));
    }
}

// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spotify Web API payloads and their conversion into core types.
//!
//! Only the fields the bot reads are modeled; everything else in the
//! payload is ignored.

use serde::Deserialize;
use sonaryx_core::{ArtistRef, ReleaseArtist, ReleaseImage, ReleaseRef};

/// Client-credentials token response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub artists: Paging<ApiArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiArtistSimple {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiImage {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// An album as listed under an artist or fetched by ID.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiAlbum {
    pub id: String,
    pub name: String,
    pub release_date: String,
    #[serde(default)]
    pub release_date_precision: Option<String>,
    pub album_type: String,
    #[serde(default)]
    pub total_tracks: u32,
    #[serde(default)]
    pub artists: Vec<ApiArtistSimple>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub images: Vec<ApiImage>,
}

/// Error envelope returned on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// The token endpoint uses a flat `{error, error_description}` shape instead.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiErrorBody {
    Detailed { status: u16, message: String },
    Code(String),
}

impl From<ApiArtist> for ArtistRef {
    fn from(a: ApiArtist) -> Self {
        ArtistRef {
            id: a.id,
            name: a.name,
            genres: a.genres,
            external_link: a.external_urls.spotify,
        }
    }
}

impl From<ApiAlbum> for ReleaseRef {
    fn from(a: ApiAlbum) -> Self {
        let external_link = a
            .external_urls
            .spotify
            .unwrap_or_else(|| format!("https://open.spotify.com/album/{}", a.id));
        ReleaseRef {
            id: a.id,
            name: a.name,
            release_date: a.release_date,
            album_type: a.album_type,
            total_tracks: a.total_tracks,
            artists: a
                .artists
                .into_iter()
                .map(|artist| ReleaseArtist { name: artist.name })
                .collect(),
            external_link,
            images: a
                .images
                .into_iter()
                .map(|i| ReleaseImage {
                    url: i.url,
                    width: i.width,
                    height: i.height,
                })
                .collect(),
        }
    }
}

// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the catalog, storage, and channel adapters.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a delivered chat message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Catalog,
    Storage,
}

// --- Subscriptions ---

/// An artist the community is subscribed to.
///
/// Owned by the storage adapter. Release checks only read `id`, `name` and
/// `last_release_id`, and write `last_release_id` back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistSubscription {
    /// Catalog identifier, unique per subscription.
    pub id: String,
    /// Display name, also used for catalog searches.
    pub name: String,
    /// Identifier of the last release classified as fresh.
    pub last_release_id: Option<String>,
    /// Optional comma-separated labels.
    pub tags: Option<String>,
    /// ISO 8601 timestamp of the subscription.
    pub created_at: String,
}

impl ArtistSubscription {
    /// Creates a subscription with no release history.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            last_release_id: None,
            tags: None,
            created_at: chrono::Utc::now()
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string(),
        }
    }
}

// --- Catalog ---

/// An artist as returned by a catalog search or lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub external_link: Option<String>,
}

/// A credited artist on a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseArtist {
    pub name: String,
}

/// Cover art for a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseImage {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// An immutable snapshot of a release from the catalog.
///
/// `release_date` keeps the catalog's precision: `YYYY-MM-DD`, `YYYY-MM` or
/// `YYYY`. Use [`crate::date_window::normalize`] before comparing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRef {
    pub id: String,
    pub name: String,
    pub release_date: String,
    pub album_type: String,
    pub total_tracks: u32,
    pub artists: Vec<ReleaseArtist>,
    pub external_link: String,
    #[serde(default)]
    pub images: Vec<ReleaseImage>,
}

impl ReleaseRef {
    /// Credited artist names joined with `, `.
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// --- Snapshots ---

/// One row of a per-day release snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRelease {
    pub spotify_link: String,
    pub artist_name: String,
    pub release_name: String,
    pub release_id: String,
    pub release_type: String,
    pub release_date: String,
}

impl DailyRelease {
    /// Builds a snapshot row for `release` credited to `artist_name`.
    pub fn from_release(artist_name: &str, release: &ReleaseRef) -> Self {
        Self {
            spotify_link: release.external_link.clone(),
            artist_name: artist_name.to_string(),
            release_name: release.name.clone(),
            release_id: release.id.clone(),
            release_type: release.album_type.clone(),
            release_date: release.release_date.clone(),
        }
    }
}

/// A release found for one artist during one run. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Subscribed artist name.
    pub artist: String,
    pub release: ReleaseRef,
    /// Public link to the release.
    pub link: String,
}

impl CheckResult {
    pub fn new(artist: &str, release: ReleaseRef) -> Self {
        let link = release.external_link.clone();
        Self {
            artist: artist.to_string(),
            release,
            link,
        }
    }

    /// Converts the result into a snapshot row.
    pub fn to_daily_release(&self) -> DailyRelease {
        DailyRelease::from_release(&self.artist, &self.release)
    }
}

// --- Channel ---

/// A message to deliver through a channel adapter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutboundMessage {
    pub text: String,
    /// User IDs allowed to be pinged by this message. Empty disables pings.
    pub mention_ids: Vec<String>,
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mention_ids: Vec::new(),
        }
    }

    pub fn with_mentions(mut self, ids: Vec<String>) -> Self {
        self.mention_ids = ids;
        self
    }
}

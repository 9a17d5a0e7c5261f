// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog adapter trait for music-streaming APIs (Spotify, etc.).

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::SonaryxError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ArtistRef, ReleaseRef};

/// Read-only access to a music catalog.
///
/// Implementations own authentication and session refresh. Every method
/// converts the raw payload into core types before returning.
#[async_trait]
pub trait CatalogAdapter: PluginAdapter {
    /// Finds the best match for an artist name. `Ok(None)` when nothing matches.
    async fn search_artist(&self, name: &str) -> Result<Option<ArtistRef>, SonaryxError>;

    /// Looks an artist up by catalog identifier.
    async fn get_artist_by_id(&self, id: &str) -> Result<Option<ArtistRef>, SonaryxError>;

    /// The artist's most recent release. `Ok(None)` when the artist has none.
    ///
    /// Fails with [`SonaryxError::ArtistNotFound`] when the name matches no artist.
    async fn get_artist_latest_release(
        &self,
        artist_name: &str,
    ) -> Result<Option<ReleaseRef>, SonaryxError>;

    /// Every release by the artist whose normalized date equals `date`.
    async fn get_artist_releases_for_date(
        &self,
        artist_name: &str,
        date: NaiveDate,
    ) -> Result<Vec<ReleaseRef>, SonaryxError>;
}

// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Sonaryx release bot.
//!
//! This crate provides the adapter traits, the shared error type, the domain
//! types, and the date-window utilities used throughout the workspace.

pub mod date_window;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use date_window::DateWindow;
pub use error::SonaryxError;
pub use types::{
    AdapterType, ArtistRef, ArtistSubscription, CheckResult, DailyRelease, HealthStatus,
    MessageId, OutboundMessage, ReleaseArtist, ReleaseImage, ReleaseRef,
};

pub use traits::{CatalogAdapter, ChannelAdapter, PluginAdapter, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::channel::format_release;

    fn sample_release() -> ReleaseRef {
        ReleaseRef {
            id: "rel-1".into(),
            name: "Fe3O4: Forward".into(),
            release_date: "2025-03-17".into(),
            album_type: "single".into(),
            total_tracks: 4,
            artists: vec![
                ReleaseArtist { name: "NMIXX".into() },
                ReleaseArtist { name: "Guest".into() },
            ],
            external_link: "https://open.spotify.com/album/rel-1".into(),
            images: Vec::new(),
        }
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        for variant in [AdapterType::Channel, AdapterType::Catalog, AdapterType::Storage] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn fetch_failures_are_classified() {
        assert!(SonaryxError::catalog("timeout").is_fetch_failure());
        assert!(SonaryxError::ArtistNotFound { name: "x".into() }.is_fetch_failure());
        assert!(!SonaryxError::Internal("x".into()).is_fetch_failure());
        assert!(
            !SonaryxError::Storage {
                source: Box::new(std::io::Error::other("disk"))
            }
            .is_fetch_failure()
        );
    }

    #[test]
    fn check_result_maps_to_snapshot_row() {
        let result = CheckResult::new("NMIXX", sample_release());
        assert_eq!(result.link, "https://open.spotify.com/album/rel-1");

        let row = result.to_daily_release();
        assert_eq!(row.artist_name, "NMIXX");
        assert_eq!(row.release_id, "rel-1");
        assert_eq!(row.release_type, "single");
        assert_eq!(row.release_date, "2025-03-17");
    }

    #[test]
    fn release_announcement_lists_all_artists() {
        let text = format_release(&sample_release());
        assert!(text.contains("**Latest single**"));
        assert!(text.contains("by **NMIXX, Guest**"));
        assert!(text.contains("🎧 Tracks: 4"));
        assert!(text.ends_with("https://open.spotify.com/album/rel-1"));
    }

    #[test]
    fn outbound_message_builder() {
        let msg = OutboundMessage::text("hi").with_mentions(vec!["12345".into()]);
        assert_eq!(msg.text, "hi");
        assert_eq!(msg.mention_ids, vec!["12345".to_string()]);
    }
}

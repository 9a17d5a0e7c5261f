// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Release fixtures.

use chrono::NaiveDate;
use sonaryx_core::{ReleaseArtist, ReleaseRef};

/// A single by `artist` with the given ID and raw release date.
pub fn release(id: &str, artist: &str, release_date: &str) -> ReleaseRef {
    ReleaseRef {
        id: id.to_string(),
        name: format!("Release {id}"),
        release_date: release_date.to_string(),
        album_type: "single".to_string(),
        total_tracks: 1,
        artists: vec![ReleaseArtist {
            name: artist.to_string(),
        }],
        external_link: format!("https://open.spotify.com/album/{id}"),
        images: Vec::new(),
    }
}

/// Shorthand for `NaiveDate::from_ymd_opt(..).unwrap()` in tests.
pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(d) => d,
        None => panic!("invalid fixture date {year}-{month}-{day}"),
    }
}

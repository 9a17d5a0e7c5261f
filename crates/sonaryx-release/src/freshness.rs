// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decides whether a fetched release is new and whether it may be reported.
//!
//! Two rules combine:
//! - the ID rule: a release is fresh when its ID differs from the artist's
//!   stored `last_release_id` (an absent ID differs from everything);
//! - the window rule: a fresh release is reportable only when its normalized
//!   date is on or after the run's cutoff.
//!
//! A fresh release outside the window is still fresh. The caller advances
//! `last_release_id` for it so it is not classified as changed again.

use chrono::NaiveDate;
use sonaryx_core::ReleaseRef;
use sonaryx_core::date_window::is_on_or_after;
use strum::Display;
use tracing::{debug, warn};

/// Classification of one release against one artist's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Freshness {
    /// New ID, dated on or after the cutoff.
    FreshAndReportable,
    /// New ID, dated before the cutoff.
    FreshButStaleDate,
    /// Same ID as last time, or an unreadable date.
    NotFresh,
}

impl Freshness {
    /// Whether the stored `last_release_id` must move to this release.
    pub fn advances_last_release(self) -> bool {
        matches!(self, Self::FreshAndReportable | Self::FreshButStaleDate)
    }

    pub fn is_reportable(self) -> bool {
        self == Self::FreshAndReportable
    }
}

/// Classify `release` for an artist whose last fresh release was `last_release_id`.
///
/// A malformed release date fails closed: the release is `NotFresh` and the
/// stored ID is left alone.
pub fn classify(
    last_release_id: Option<&str>,
    release: &ReleaseRef,
    cutoff: NaiveDate,
) -> Freshness {
    if last_release_id == Some(release.id.as_str()) {
        return Freshness::NotFresh;
    }

    match is_on_or_after(&release.release_date, cutoff) {
        Ok(true) => Freshness::FreshAndReportable,
        Ok(false) => Freshness::FreshButStaleDate,
        Err(e) => {
            warn!(release_id = %release.id, error = %e, "treating release as not fresh");
            Freshness::NotFresh
        }
    }
}

/// Window rule alone: the release is dated on or after `cutoff`.
///
/// Unreadable dates are outside every window.
pub fn within_window(release: &ReleaseRef, cutoff: NaiveDate) -> bool {
    let inside = is_on_or_after(&release.release_date, cutoff).unwrap_or(false);
    debug!(
        release_date = %release.release_date,
        %cutoff,
        inside,
        "date comparison"
    );
    inside
}

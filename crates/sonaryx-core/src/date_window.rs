// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calendar-date normalization and timezone-aware "today" arithmetic.
//!
//! Catalog release dates come in three precisions. Month and year precision
//! snap to the first day of the period, so a release dated `2023` compares
//! as `2023-01-01`.

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::SonaryxError;

/// Render format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalizes a release date of day, month or year precision to a calendar date.
pub fn normalize(value: &str) -> Result<NaiveDate, SonaryxError> {
    let malformed = || SonaryxError::MalformedDate {
        value: value.to_string(),
    };
    if !has_date_shape(value) {
        return Err(malformed());
    }
    let padded = match value.len() {
        10 => value.to_string(),
        7 => format!("{value}-01"),
        _ => format!("{value}-01-01"),
    };

    NaiveDate::parse_from_str(&padded, DATE_FORMAT).map_err(|_| malformed())
}

/// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`: ASCII digits with `-` only at bytes 4 and 7.
fn has_date_shape(value: &str) -> bool {
    matches!(value.len(), 4 | 7 | 10)
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Returns `true` when `release_date` falls on or after `cutoff`.
pub fn is_on_or_after(release_date: &str, cutoff: NaiveDate) -> Result<bool, SonaryxError> {
    Ok(normalize(release_date)? >= cutoff)
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, SonaryxError> {
    if value.len() != 10 {
        return Err(SonaryxError::MalformedDate {
            value: value.to_string(),
        });
    }
    normalize(value)
}

/// Renders a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Calendar arithmetic anchored to one IANA timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    tz: Tz,
}

impl DateWindow {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Builds a window from an IANA zone name such as `Asia/Seoul`.
    pub fn from_name(name: &str) -> Result<Self, SonaryxError> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| SonaryxError::Config(format!("unknown timezone `{name}`")))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// The current calendar date as observed in this window's zone.
    pub fn today(&self) -> NaiveDate {
        self.today_at(Utc::now())
    }

    /// The calendar date in this window's zone at instant `now`.
    pub fn today_at(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.tz).date_naive()
    }

    /// Adds `delta_days` whole days (possibly negative) to `date`.
    ///
    /// Saturates at the representable calendar range.
    pub fn shift_days(&self, date: NaiveDate, delta_days: i64) -> NaiveDate {
        let magnitude = Days::new(delta_days.unsigned_abs());
        let shifted = if delta_days >= 0 {
            date.checked_add_days(magnitude)
        } else {
            date.checked_sub_days(magnitude)
        };
        shifted.unwrap_or(date)
    }

    /// The day before `date`.
    pub fn yesterday(&self, date: NaiveDate) -> NaiveDate {
        self.shift_days(date, -1)
    }

    /// Earliest reportable date for a look-back of `window_days` ending on `today`.
    pub fn cutoff(&self, today: NaiveDate, window_days: u32) -> NaiveDate {
        self.shift_days(today, -i64::from(window_days))
    }
}

impl Default for DateWindow {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-day release snapshots.
//!
//! A snapshot is replaced as a whole: delete every row for the date, then
//! insert the new rows, inside one transaction.

use chrono::NaiveDate;
use rusqlite::params;
use sonaryx_core::date_window::format_date;
use sonaryx_core::{DailyRelease, SonaryxError};
use tracing::info;

use crate::database::{Database, map_tr_err};

/// Replace the snapshot for `date`.
pub async fn replace_for_date(
    db: &Database,
    date: NaiveDate,
    releases: &[DailyRelease],
) -> Result<(), SonaryxError> {
    let day = format_date(date);
    let rows = releases.to_vec();
    let count = rows.len();
    let log_day = day.clone();

    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM daily_releases WHERE date = ?1", params![day])?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO daily_releases
                        (date, spotify_link, artist_name, release_name, release_id, release_type, release_date)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                )?;
                for r in &rows {
                    stmt.execute(params![
                        day,
                        r.spotify_link,
                        r.artist_name,
                        r.release_name,
                        r.release_id,
                        r.release_type,
                        r.release_date,
                    ])?;
                }
            }
            tx.commit()
        })
        .await
        .map_err(map_tr_err)?;

    if count == 0 {
        info!(date = %log_day, "cleared daily releases (no releases)");
    } else {
        info!(date = %log_day, count, "stored daily releases");
    }
    Ok(())
}

/// Snapshot rows for `date` in insertion order.
pub async fn list_for_date(db: &Database, date: NaiveDate) -> Result<Vec<DailyRelease>, SonaryxError> {
    let day = format_date(date);
    db.connection()
        .call(move |conn| -> Result<Vec<DailyRelease>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT spotify_link, artist_name, release_name, release_id, release_type, release_date
                 FROM daily_releases WHERE date = ?1 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![day], |row| {
                Ok(DailyRelease {
                    spotify_link: row.get(0)?,
                    artist_name: row.get(1)?,
                    release_name: row.get(2)?,
                    release_id: row.get(3)?,
                    release_type: row.get(4)?,
                    release_date: row.get(5)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Release IDs recorded for `date`.
pub async fn release_ids_for_date(
    db: &Database,
    date: NaiveDate,
) -> Result<Vec<String>, SonaryxError> {
    let day = format_date(date);
    db.connection()
        .call(move |conn| -> Result<Vec<String>, rusqlite::Error> {
            let mut stmt =
                conn.prepare("SELECT release_id FROM daily_releases WHERE date = ?1 ORDER BY id ASC")?;
            let rows = stmt.query_map(params![day], |row| row.get(0))?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

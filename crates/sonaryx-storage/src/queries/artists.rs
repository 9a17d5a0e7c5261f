// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Artist subscription operations.

use rusqlite::{OptionalExtension, Row, params};
use sonaryx_core::{ArtistSubscription, SonaryxError};

use crate::database::{Database, map_tr_err};

const SELECT_COLUMNS: &str = "SELECT id, name, last_release_id, tags, created_at FROM artists";

fn row_to_artist(row: &Row<'_>) -> rusqlite::Result<ArtistSubscription> {
    Ok(ArtistSubscription {
        id: row.get(0)?,
        name: row.get(1)?,
        last_release_id: row.get(2)?,
        tags: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Insert a subscription, or rename it if the ID already exists.
///
/// An existing `last_release_id` survives the upsert.
pub async fn upsert_artist(
    db: &Database,
    id: &str,
    name: &str,
) -> Result<ArtistSubscription, SonaryxError> {
    let id = id.to_string();
    let name = name.to_string();
    db.connection()
        .call(move |conn| -> Result<ArtistSubscription, rusqlite::Error> {
            conn.execute(
                "INSERT INTO artists (id, name) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![id, name],
            )?;
            conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_artist,
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Get a subscription by catalog ID.
pub async fn get_artist(db: &Database, id: &str) -> Result<Option<ArtistSubscription>, SonaryxError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<ArtistSubscription>, rusqlite::Error> {
            conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_artist,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a subscription, returning the removed row.
pub async fn delete_artist(
    db: &Database,
    id: &str,
) -> Result<Option<ArtistSubscription>, SonaryxError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<ArtistSubscription>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let existing = tx
                .query_row(
                    &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                    params![id],
                    row_to_artist,
                )
                .optional()?;
            if existing.is_some() {
                tx.execute("DELETE FROM artists WHERE id = ?1", params![id])?;
            }
            tx.commit()?;
            Ok(existing)
        })
        .await
        .map_err(map_tr_err)
}

/// List all subscriptions, newest first.
pub async fn list_artists(db: &Database) -> Result<Vec<ArtistSubscription>, SonaryxError> {
    db.connection()
        .call(|conn| -> Result<Vec<ArtistSubscription>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt.query_map([], row_to_artist)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Set the last fresh release ID for an artist.
///
/// Updating an unknown artist is a storage error.
pub async fn update_last_release(
    db: &Database,
    artist_id: &str,
    release_id: &str,
) -> Result<(), SonaryxError> {
    let artist_id = artist_id.to_string();
    let release_id = release_id.to_string();
    let updated = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE artists SET last_release_id = ?1,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2",
                params![release_id, artist_id],
            )
        })
        .await
        .map_err(map_tr_err)?;

    if updated == 0 {
        return Err(SonaryxError::Storage {
            source: "no subscription with that artist id".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn upsert_and_get_roundtrips() {
        let (db, _dir) = setup_db().await;

        let created = upsert_artist(&db, "art-1", "NMIXX").await.unwrap();
        assert_eq!(created.id, "art-1");
        assert!(created.last_release_id.is_none());

        let fetched = get_artist(&db, "art-1").await.unwrap().unwrap();
        assert_eq!(fetched.name, "NMIXX");
        assert!(get_artist(&db, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_renames_but_keeps_last_release() {
        let (db, _dir) = setup_db().await;
        upsert_artist(&db, "art-1", "Old Name").await.unwrap();
        update_last_release(&db, "art-1", "rel-9").await.unwrap();

        let renamed = upsert_artist(&db, "art-1", "New Name").await.unwrap();
        assert_eq!(renamed.name, "New Name");
        assert_eq!(renamed.last_release_id.as_deref(), Some("rel-9"));
        assert_eq!(list_artists(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let (db, _dir) = setup_db().await;
        upsert_artist(&db, "a", "First").await.unwrap();
        upsert_artist(&db, "b", "Second").await.unwrap();
        upsert_artist(&db, "c", "Third").await.unwrap();

        let names: Vec<String> = list_artists(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn delete_returns_removed_row() {
        let (db, _dir) = setup_db().await;
        upsert_artist(&db, "a", "Gone").await.unwrap();

        let removed = delete_artist(&db, "a").await.unwrap();
        assert_eq!(removed.map(|a| a.name).as_deref(), Some("Gone"));
        assert!(delete_artist(&db, "a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn updating_unknown_artist_is_an_error() {
        let (db, _dir) = setup_db().await;
        let err = update_last_release(&db, "ghost", "rel").await.unwrap_err();
        assert!(matches!(err, SonaryxError::Storage { .. }));
    }
}

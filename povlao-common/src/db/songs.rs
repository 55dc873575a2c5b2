//! `songs` table operations

use crate::models::CatalogEntry;
use crate::Result;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;

/// File name → stored modification time for every catalog row
pub async fn load_modified_map(pool: &SqlitePool) -> Result<HashMap<String, i64>> {
    let rows = sqlx::query("SELECT file, modified FROM songs")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| {
            let file: String = row.get("file");
            let modified: Option<i64> = row.get("modified");
            (file, modified.unwrap_or_default())
        })
        .collect())
}

/// Delete the given files in one transaction, returning rows removed
pub async fn delete_files(pool: &SqlitePool, files: &[String]) -> Result<u64> {
    if files.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut removed = 0;
    for file in files {
        removed += sqlx::query("DELETE FROM songs WHERE file = ?")
            .bind(file)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }
    tx.commit().await?;

    Ok(removed)
}

/// Insert or replace the row for `entry.file`
pub async fn upsert_song(pool: &SqlitePool, entry: &CatalogEntry) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO songs (title, artist, file, coverUrl, popularity, modified)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(file) DO UPDATE SET
            title = excluded.title,
            artist = excluded.artist,
            coverUrl = excluded.coverUrl,
            popularity = excluded.popularity,
            modified = excluded.modified
        "#,
    )
    .bind(&entry.title)
    .bind(&entry.artist)
    .bind(&entry.file)
    .bind(&entry.cover_url)
    .bind(entry.popularity)
    .bind(entry.modified)
    .execute(pool)
    .await?;

    Ok(())
}

/// All catalog rows in insertion order
pub async fn load_all_songs(pool: &SqlitePool) -> Result<Vec<CatalogEntry>> {
    let rows = sqlx::query(
        "SELECT title, artist, file, coverUrl, popularity, modified FROM songs ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| CatalogEntry {
            title: row.get::<Option<String>, _>("title").unwrap_or_default(),
            artist: row.get::<Option<String>, _>("artist").unwrap_or_default(),
            file: row.get("file"),
            cover_url: row.get("coverUrl"),
            popularity: row.get("popularity"),
            modified: row.get::<Option<i64>, _>("modified").unwrap_or_default(),
        })
        .collect())
}

/// Number of catalog rows
pub async fn count_songs(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

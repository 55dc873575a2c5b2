//! In-memory snapshot of the song catalog
//!
//! Loaded from the database at startup and swapped wholesale after each
//! ingestion run. Readers get a cheap `Arc` clone of the current list.

use std::sync::Arc;

use povlao_common::db::songs;
use povlao_common::CatalogEntry;
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Default)]
pub struct CatalogCache {
    songs: RwLock<Arc<Vec<CatalogEntry>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self {
            songs: RwLock::new(Arc::new(entries)),
        }
    }

    /// Current catalog
    pub async fn snapshot(&self) -> Arc<Vec<CatalogEntry>> {
        self.songs.read().await.clone()
    }

    pub async fn replace(&self, entries: Vec<CatalogEntry>) {
        *self.songs.write().await = Arc::new(entries);
    }

    /// Reload the whole catalog from the database
    pub async fn reload(&self, pool: &SqlitePool) -> povlao_common::Result<usize> {
        let entries = songs::load_all_songs(pool).await?;
        let count = entries.len();
        self.replace(entries).await;
        info!(songs = count, "Catalog cache loaded");
        Ok(count)
    }
}

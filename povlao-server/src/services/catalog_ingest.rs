//! Catalog ingestion job
//!
//! Brings the `songs` table in line with the songs directory:
//! 1. Rows whose file is gone are deleted in one transaction. A file that is
//!    listed but cannot be stat'ed keeps its row untouched.
//! 2. Files that are new, or whose mtime differs from the stored value, are
//!    re-processed by a bounded pool of workers.
//! 3. Each worker parses the file name, extracts cover art, looks up
//!    popularity and upserts the row.
//!
//! A failure on one file is logged and counted; it never aborts the batch.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use povlao_common::db::songs;
use povlao_common::{CatalogEntry, UNKNOWN_ARTIST};
use sqlx::SqlitePool;
use thiserror::Error;

use super::cover_art::{CoverArt, LoftyTagReader, TagReader};
use super::file_scanner::{FileScanner, ScanError, ScannedFile};
use super::filename::parse_song_filename;
use super::popularity::PopularitySource;
use crate::catalog_cache::CatalogCache;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Storage(#[from] povlao_common::Error),

    #[error("Worker task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub songs_dir: PathBuf,
    pub extensions: Vec<String>,
    pub concurrency: usize,
}

/// Outcome of one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Audio files found in the directory
    pub scanned: usize,
    /// Rows removed because their file disappeared
    pub deleted: u64,
    /// Files upserted
    pub processed: usize,
    /// Files that could not be stored
    pub failed: usize,
    /// Files present but not stat'able; their rows are left as they were
    pub unreadable: usize,
}

pub struct CatalogIngestJob {
    db: SqlitePool,
    config: IngestConfig,
    tags: Arc<dyn TagReader>,
    covers: CoverArt,
    popularity: Option<Arc<dyn PopularitySource>>,
}

impl CatalogIngestJob {
    pub fn new(db: SqlitePool, config: IngestConfig, covers: CoverArt) -> Self {
        Self {
            db,
            config,
            tags: Arc::new(LoftyTagReader),
            covers,
            popularity: None,
        }
    }

    pub fn with_tag_reader(mut self, tags: Arc<dyn TagReader>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_popularity(mut self, popularity: Arc<dyn PopularitySource>) -> Self {
        self.popularity = Some(popularity);
        self
    }

    pub async fn run(&self) -> Result<IngestReport, IngestError> {
        let scanner = FileScanner::new(&self.config.extensions);
        let songs_dir = self.config.songs_dir.clone();
        let scan = tokio::task::spawn_blocking(move || scanner.scan(&songs_dir))
            .await
            .map_err(|e| IngestError::Task(e.to_string()))??;
        let files = scan.files;

        let existing = songs::load_modified_map(&self.db).await?;

        let present: HashSet<&str> = files
            .iter()
            .map(|f| f.name.as_str())
            .chain(scan.unreadable.iter().map(String::as_str))
            .collect();
        let removed: Vec<String> = existing
            .keys()
            .filter(|file| !present.contains(file.as_str()))
            .cloned()
            .collect();
        let deleted = if removed.is_empty() {
            0
        } else {
            songs::delete_files(&self.db, &removed).await?
        };

        let work: Vec<ScannedFile> = files
            .iter()
            .filter(|f| existing.get(&f.name) != Some(&f.modified))
            .cloned()
            .collect();

        tracing::info!(
            songs_dir = %self.config.songs_dir.display(),
            found = files.len(),
            changed = work.len(),
            unreadable = scan.unreadable.len(),
            deleted,
            "Ingestion started"
        );

        let popularity = self.prepare_popularity().await;

        let results: Vec<bool> = stream::iter(work)
            .map(|file| {
                let popularity = popularity.clone();
                async move {
                    match self.process_file(&file, popularity.as_deref()).await {
                        Ok(()) => true,
                        Err(e) => {
                            tracing::error!(file = %file.name, error = %e, "File ingestion failed");
                            false
                        }
                    }
                }
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;

        let report = IngestReport {
            scanned: files.len(),
            deleted,
            processed: results.iter().filter(|ok| **ok).count(),
            failed: results.iter().filter(|ok| !**ok).count(),
            unreadable: scan.unreadable.len(),
        };

        tracing::info!(
            scanned = report.scanned,
            processed = report.processed,
            deleted = report.deleted,
            failed = report.failed,
            unreadable = report.unreadable,
            "Ingestion complete"
        );
        Ok(report)
    }

    /// Run ingestion, then swap the refreshed table into the cache
    pub async fn run_and_reload(&self, cache: &CatalogCache) -> Result<IngestReport, IngestError> {
        let report = self.run().await?;
        cache.reload(&self.db).await?;
        Ok(report)
    }

    /// Enrichment source for this run, if configured and reachable
    async fn prepare_popularity(&self) -> Option<Arc<dyn PopularitySource>> {
        let source = self.popularity.clone()?;
        match source.prepare().await {
            Ok(()) => Some(source),
            Err(e) => {
                tracing::warn!(error = %e, "Popularity enrichment disabled for this run");
                None
            }
        }
    }

    async fn process_file(
        &self,
        file: &ScannedFile,
        popularity: Option<&dyn PopularitySource>,
    ) -> Result<(), IngestError> {
        let parsed = parse_song_filename(&file.name);

        let tags = Arc::clone(&self.tags);
        let path = file.path.clone();
        let image = match tokio::task::spawn_blocking(move || tags.cover_image(&path)).await {
            Ok(Ok(image)) => image,
            Ok(Err(e)) => {
                tracing::debug!(file = %file.name, error = %e, "No readable tags");
                None
            }
            Err(e) => {
                tracing::warn!(file = %file.name, error = %e, "Tag reader task failed");
                None
            }
        };

        let popularity = match popularity {
            Some(source) if parsed.artist != UNKNOWN_ARTIST && !parsed.title.is_empty() => {
                match source.lookup(&parsed.artist, &parsed.title).await {
                    Ok(score) => Some(score.unwrap_or(0)),
                    Err(e) => {
                        tracing::debug!(file = %file.name, error = %e, "Popularity lookup failed");
                        Some(0)
                    }
                }
            }
            Some(_) => Some(0),
            None => None,
        };

        let entry = CatalogEntry {
            title: parsed.title,
            artist: parsed.artist,
            file: file.name.clone(),
            cover_url: Some(self.covers.resolve(image.as_deref())),
            modified: file.modified,
            popularity,
        };

        songs::upsert_song(&self.db, &entry).await?;
        tracing::debug!(file = %entry.file, "Song ingested");
        Ok(())
    }
}

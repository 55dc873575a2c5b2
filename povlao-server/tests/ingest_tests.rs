//! Integration tests for catalog ingestion
//!
//! Songs directories are temporary; tag reading and popularity lookups use
//! in-process fakes, except where the lofty reader or a local HTTP server
//! standing in for the Spotify API is exercised on purpose.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use axum::{
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::SqlitePool;
use tempfile::TempDir;

use povlao_common::db::songs;
use povlao_common::{CatalogEntry, UNKNOWN_ARTIST};
use povlao_server::catalog_cache::CatalogCache;
use povlao_server::services::cover_art::TagError;
use povlao_server::services::{
    CatalogIngestJob, CoverArt, IngestConfig, IngestError, PopularityError, PopularitySource,
    SpotifyCredentials, SpotifyPopularity, TagReader,
};

const GIF: &[u8] = b"GIF89a";

#[derive(Default)]
struct FakeTags {
    covers: HashMap<String, Vec<u8>>,
}

impl TagReader for FakeTags {
    fn cover_image(&self, path: &Path) -> Result<Option<Vec<u8>>, TagError> {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        Ok(self.covers.get(&name).cloned())
    }
}

#[derive(Default)]
struct FakePopularity {
    fail_prepare: bool,
    lookups: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl PopularitySource for FakePopularity {
    async fn prepare(&self) -> Result<(), PopularityError> {
        if self.fail_prepare {
            return Err(PopularityError::AuthError("bad credentials".to_string()));
        }
        Ok(())
    }

    async fn lookup(&self, artist: &str, title: &str) -> Result<Option<i64>, PopularityError> {
        self.lookups
            .lock()
            .unwrap()
            .push((artist.to_string(), title.to_string()));
        match artist {
            "Daft Punk" => Ok(Some(42)),
            "Broken" => Err(PopularityError::NetworkError("connection reset".to_string())),
            _ => Ok(None),
        }
    }
}

struct Fixture {
    dir: TempDir,
    db: SqlitePool,
}

impl Fixture {
    async fn new(files: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("songs")).unwrap();
        let fixture = Self {
            dir,
            db: povlao_common::db::init_in_memory().await.unwrap(),
        };
        for file in files {
            fixture.add(file);
        }
        fixture
    }

    fn songs_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("songs")
    }

    fn add(&self, name: &str) {
        fs::write(self.songs_dir().join(name), b"ID3 not really audio").unwrap();
    }

    fn remove(&self, name: &str) {
        fs::remove_file(self.songs_dir().join(name)).unwrap();
    }

    fn touch(&self, name: &str) {
        let file = fs::File::options()
            .write(true)
            .open(self.songs_dir().join(name))
            .unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(120))
            .unwrap();
    }

    fn job(&self) -> CatalogIngestJob {
        CatalogIngestJob::new(
            self.db.clone(),
            IngestConfig {
                songs_dir: self.songs_dir(),
                extensions: vec!["mp3".to_string()],
                concurrency: 4,
            },
            CoverArt::builtin(),
        )
        .with_tag_reader(Arc::new(FakeTags::default()))
    }

    async fn rows(&self) -> HashMap<String, CatalogEntry> {
        songs::load_all_songs(&self.db)
            .await
            .unwrap()
            .into_iter()
            .map(|e| (e.file.clone(), e))
            .collect()
    }
}

#[tokio::test]
async fn test_first_run_ingests_every_file() {
    let fx = Fixture::new(&["Daft Punk - One More Time.mp3", "Unknown.mp3", "cover.jpg"]).await;

    let report = fx.job().run().await.unwrap();
    assert_eq!(report.scanned, 2);
    assert_eq!(report.processed, 2);
    assert_eq!(report.deleted, 0);
    assert_eq!(report.failed, 0);

    let rows = fx.rows().await;
    let daft = &rows["Daft Punk - One More Time.mp3"];
    assert_eq!(daft.artist, "Daft Punk");
    assert_eq!(daft.title, "One More Time");
    assert!(daft.modified > 0);
    assert_eq!(daft.popularity, None);

    let unknown = &rows["Unknown.mp3"];
    assert_eq!(unknown.artist, UNKNOWN_ARTIST);
    assert_eq!(unknown.title, "Unknown");
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let fx = Fixture::new(&["A - X.mp3", "A - Y.mp3", "B - Z.mp3"]).await;
    let job = fx.job();

    job.run().await.unwrap();
    let before = fx.rows().await;

    let report = job.run().await.unwrap();
    assert_eq!(report.scanned, 3);
    assert_eq!(report.processed, 0);
    assert_eq!(report.deleted, 0);
    assert_eq!(fx.rows().await, before);
}

#[tokio::test]
async fn test_removed_file_deletes_exactly_its_row() {
    let fx = Fixture::new(&["A - X.mp3", "A - Y.mp3", "B - Z.mp3"]).await;
    let job = fx.job();
    job.run().await.unwrap();

    fx.remove("A - Y.mp3");
    let report = job.run().await.unwrap();
    assert_eq!(report.deleted, 1);
    assert_eq!(report.processed, 0);

    let rows = fx.rows().await;
    assert_eq!(rows.len(), 2);
    assert!(rows.contains_key("A - X.mp3"));
    assert!(rows.contains_key("B - Z.mp3"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_unstatable_file_keeps_its_row() {
    let fx = Fixture::new(&["A - X.mp3", "B - Z.mp3"]).await;
    let job = fx.job();
    job.run().await.unwrap();
    let before = fx.rows().await;

    // Still listed in the directory, but its metadata cannot be read
    fx.remove("A - X.mp3");
    std::os::unix::fs::symlink(
        fx.songs_dir().join("gone.flac"),
        fx.songs_dir().join("A - X.mp3"),
    )
    .unwrap();

    let report = job.run().await.unwrap();
    assert_eq!(report.deleted, 0);
    assert_eq!(report.processed, 0);
    assert_eq!(report.unreadable, 1);
    assert_eq!(report.scanned, 1);
    assert_eq!(fx.rows().await, before);
}

#[tokio::test]
async fn test_changed_and_new_files_are_reprocessed() {
    let fx = Fixture::new(&["A - X.mp3", "B - Z.mp3"]).await;
    let job = fx.job();
    job.run().await.unwrap();

    fx.touch("A - X.mp3");
    fx.add("C - New.mp3");
    let report = job.run().await.unwrap();
    assert_eq!(report.processed, 2);
    assert_eq!(fx.rows().await.len(), 3);
}

#[tokio::test]
async fn test_cover_art_and_placeholder() {
    let fx = Fixture::new(&["A - Art.mp3", "B - Plain.mp3"]).await;
    let mut tags = FakeTags::default();
    tags.covers.insert("A - Art.mp3".to_string(), GIF.to_vec());

    fx.job().with_tag_reader(Arc::new(tags)).run().await.unwrap();

    let rows = fx.rows().await;
    assert_eq!(
        rows["A - Art.mp3"].cover_url.as_deref(),
        Some("data:image/gif;base64,R0lGODlh")
    );
    assert_eq!(
        rows["B - Plain.mp3"].cover_url.as_deref(),
        Some(CoverArt::builtin().placeholder())
    );
}

#[tokio::test]
async fn test_unreadable_audio_gets_placeholder_cover() {
    let fx = Fixture::new(&["A - Fake.mp3"]).await;
    let placeholder = fx.dir.path().join("placeholder.jpg");
    fs::write(&placeholder, [0xFF, 0xD8, 0xFF]).unwrap();

    // Default lofty reader on a file that is not real audio
    let job = CatalogIngestJob::new(
        fx.db.clone(),
        IngestConfig {
            songs_dir: fx.songs_dir(),
            extensions: vec!["mp3".to_string()],
            concurrency: 1,
        },
        CoverArt::load(&placeholder),
    );
    let report = job.run().await.unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(
        fx.rows().await["A - Fake.mp3"].cover_url.as_deref(),
        Some("data:image/jpeg;base64,/9j/")
    );
}

#[tokio::test]
async fn test_popularity_enrichment() {
    let fx = Fixture::new(&[
        "Daft Punk - One More Time.mp3",
        "Broken - Song.mp3",
        "Nobody - Obscure.mp3",
        "Untitled.mp3",
    ])
    .await;
    let popularity = Arc::new(FakePopularity::default());

    let report = fx
        .job()
        .with_popularity(popularity.clone())
        .run()
        .await
        .unwrap();
    assert_eq!(report.processed, 4);
    assert_eq!(report.failed, 0);

    let rows = fx.rows().await;
    assert_eq!(rows["Daft Punk - One More Time.mp3"].popularity, Some(42));
    assert_eq!(rows["Broken - Song.mp3"].popularity, Some(0));
    assert_eq!(rows["Nobody - Obscure.mp3"].popularity, Some(0));
    assert_eq!(rows["Untitled.mp3"].popularity, Some(0));

    let lookups = popularity.lookups.lock().unwrap();
    assert_eq!(lookups.len(), 3);
    assert!(lookups.iter().all(|(artist, _)| artist != UNKNOWN_ARTIST));
}

#[tokio::test]
async fn test_failed_prepare_disables_enrichment() {
    let fx = Fixture::new(&["Daft Punk - One More Time.mp3"]).await;
    let popularity = Arc::new(FakePopularity {
        fail_prepare: true,
        ..Default::default()
    });

    fx.job()
        .with_popularity(popularity.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(fx.rows().await["Daft Punk - One More Time.mp3"].popularity, None);
    assert!(popularity.lookups.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_songs_directory_is_scan_error() {
    let fx = Fixture::new(&[]).await;
    fs::remove_dir(fx.songs_dir()).unwrap();
    assert!(matches!(fx.job().run().await, Err(IngestError::Scan(_))));
}

#[tokio::test]
async fn test_run_and_reload_refreshes_cache() {
    let fx = Fixture::new(&["A - X.mp3", "B - Z.mp3"]).await;
    let cache = CatalogCache::new();

    fx.job().run_and_reload(&cache).await.unwrap();
    assert_eq!(cache.snapshot().await.len(), 2);

    fx.remove("B - Z.mp3");
    fx.job().run_and_reload(&cache).await.unwrap();
    let snapshot = cache.snapshot().await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].file, "A - X.mp3");
}

// =============================================================================
// Spotify client against a local stand-in server
// =============================================================================

async fn spawn_spotify_stub(search_delay: Duration) -> String {
    let app = Router::new()
        .route(
            "/api/token",
            post(|| async { Json(json!({"access_token": "stub-token", "token_type": "Bearer"})) }),
        )
        .route(
            "/v1/search",
            get(move |headers: HeaderMap| async move {
                tokio::time::sleep(search_delay).await;
                let authorized = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    == Some("Bearer stub-token");
                if !authorized {
                    return (StatusCode::UNAUTHORIZED, Json(json!({})));
                }
                (
                    StatusCode::OK,
                    Json(json!({"tracks": {"items": [{"popularity": 77}]}})),
                )
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn spotify_client(base: &str, timeout: Duration) -> SpotifyPopularity {
    SpotifyPopularity::new(
        SpotifyCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        },
        timeout,
    )
    .unwrap()
    .with_endpoints(format!("{base}/api/token"), format!("{base}/v1"))
}

#[tokio::test]
async fn test_spotify_popularity_lookup() {
    let base = spawn_spotify_stub(Duration::ZERO).await;
    let client = spotify_client(&base, Duration::from_secs(5));

    client.prepare().await.unwrap();
    assert_eq!(client.lookup("Daft Punk", "One More Time").await.unwrap(), Some(77));
}

#[tokio::test]
async fn test_spotify_timeout_degrades_to_zero() {
    let base = spawn_spotify_stub(Duration::from_secs(3)).await;
    let fx = Fixture::new(&["Daft Punk - One More Time.mp3"]).await;
    let client = spotify_client(&base, Duration::from_millis(200));

    let report = fx
        .job()
        .with_popularity(Arc::new(client))
        .run()
        .await
        .unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(fx.rows().await["Daft Punk - One More Time.mp3"].popularity, Some(0));
}

//! Catalog ingestion services

pub mod catalog_ingest;
pub mod cover_art;
pub mod file_scanner;
pub mod filename;
pub mod popularity;

pub use catalog_ingest::{CatalogIngestJob, IngestConfig, IngestError, IngestReport};
pub use cover_art::{CoverArt, LoftyTagReader, TagReader};
pub use file_scanner::{FileScanner, ScanError, ScanResult, ScannedFile};
pub use filename::{parse_song_filename, ParsedName};
pub use popularity::{PopularityError, PopularitySource, SpotifyCredentials, SpotifyPopularity};

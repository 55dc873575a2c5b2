//! Server configuration
//!
//! Command-line arguments (with environment fallbacks) override the TOML
//! file, which overrides the compiled defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use povlao_common::config::{
    CompiledDefaults, RootFolderInitializer, RootFolderResolver, TomlConfig,
};

use crate::services::popularity::SpotifyCredentials;

/// Command-line arguments for povlao-server
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "povlao-server")]
#[command(about = "Song catalog, leaderboard and feedback server for Povlao Guess")]
#[command(version)]
pub struct Args {
    /// Address to bind
    #[arg(long, env = "POVLAO_HOST")]
    pub host: Option<String>,

    /// HTTP port
    #[arg(short, long, env = "POVLAO_PORT")]
    pub port: Option<u16>,

    /// Root folder holding the database and JSON stores
    /// (environment: POVLAO_ROOT_FOLDER)
    #[arg(short, long)]
    pub root_folder: Option<PathBuf>,

    /// Directory of audio files (defaults to <root>/songs)
    #[arg(long, env = "POVLAO_SONGS_DIR")]
    pub songs_dir: Option<PathBuf>,

    /// Image used when a file has no embedded cover art
    #[arg(long, env = "POVLAO_PLACEHOLDER_COVER")]
    pub placeholder_cover: Option<PathBuf>,

    /// Files processed concurrently during ingestion
    #[arg(long, env = "POVLAO_INGEST_CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// Songs remembered to avoid repeats in random selection
    #[arg(long, env = "POVLAO_RECENT_CAPACITY")]
    pub recent_capacity: Option<usize>,

    /// Path of the TOML config file
    #[arg(long, env = "POVLAO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "POVLAO_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[arg(long, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
    pub spotify_client_id: Option<String>,

    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub spotify_client_secret: Option<String>,

    /// Serve the existing catalog without scanning the songs directory
    #[arg(long)]
    pub skip_ingest: bool,
}

/// Fully resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub root_folder: PathBuf,
    pub songs_dir: PathBuf,
    pub database_path: PathBuf,
    pub feedback_path: PathBuf,
    pub leaderboard_path: PathBuf,
    pub placeholder_cover: PathBuf,
    pub log_level: String,
    pub ingest_concurrency: usize,
    pub recent_capacity: usize,
    pub enrichment_timeout: Duration,
    pub audio_extensions: Vec<String>,
    pub spotify: Option<SpotifyCredentials>,
    pub skip_ingest: bool,
}

impl ServerConfig {
    pub fn resolve(args: &Args, toml: &TomlConfig) -> Self {
        let defaults = CompiledDefaults::for_current_platform();
        let root_folder = RootFolderResolver::new(args.root_folder.as_deref(), toml).resolve();
        let layout = RootFolderInitializer::new(root_folder.clone());

        let client_id = args
            .spotify_client_id
            .clone()
            .or_else(|| toml.spotify.client_id.clone());
        let client_secret = args
            .spotify_client_secret
            .clone()
            .or_else(|| toml.spotify.client_secret.clone());
        let spotify = match (client_id, client_secret) {
            (Some(client_id), Some(client_secret))
                if !client_id.is_empty() && !client_secret.is_empty() =>
            {
                Some(SpotifyCredentials {
                    client_id,
                    client_secret,
                })
            }
            _ => None,
        };

        Self {
            host: args
                .host
                .clone()
                .or_else(|| toml.host.clone())
                .unwrap_or(defaults.host),
            port: args.port.or(toml.port).unwrap_or(defaults.port),
            songs_dir: args
                .songs_dir
                .clone()
                .or_else(|| toml.songs_dir.clone())
                .unwrap_or_else(|| layout.songs_dir()),
            database_path: layout.database_path(),
            feedback_path: layout.feedback_path(),
            leaderboard_path: layout.leaderboard_path(),
            placeholder_cover: args
                .placeholder_cover
                .clone()
                .or_else(|| toml.placeholder_cover.clone())
                .unwrap_or_else(|| layout.placeholder_cover_path()),
            log_level: args
                .log_level
                .clone()
                .or_else(|| toml.log_level.clone())
                .unwrap_or(defaults.log_level),
            ingest_concurrency: args
                .concurrency
                .or(toml.ingest_concurrency)
                .unwrap_or(defaults.ingest_concurrency)
                .max(1),
            recent_capacity: args
                .recent_capacity
                .or(toml.recent_capacity)
                .unwrap_or(defaults.recent_capacity),
            enrichment_timeout: Duration::from_secs(
                toml.enrichment_timeout_secs
                    .unwrap_or(defaults.enrichment_timeout_secs),
            ),
            audio_extensions: toml
                .audio_extensions
                .clone()
                .filter(|exts| !exts.is_empty())
                .unwrap_or(defaults.audio_extensions),
            spotify,
            skip_ingest: args.skip_ingest,
            root_folder,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid listen address {addr}: {e}"))
    }
}

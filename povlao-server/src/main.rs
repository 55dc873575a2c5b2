//! povlao-server binary
//!
//! Resolves configuration, opens the catalog database, starts ingestion in
//! the background and serves the HTTP API until Ctrl-C or SIGTERM.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use povlao_common::config::{load_toml_config, RootFolderInitializer};
use povlao_server::catalog_cache::CatalogCache;
use povlao_server::config::{Args, ServerConfig};
use povlao_server::services::{
    CatalogIngestJob, CoverArt, IngestConfig, PopularitySource, SpotifyPopularity,
};
use povlao_server::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml = load_toml_config(args.config.as_deref()).context("Failed to load config file")?;
    let config = ServerConfig::resolve(&args, &toml);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "povlao_server={level},povlao_common={level},tower_http={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Povlao Guess server v{}", env!("CARGO_PKG_VERSION"));
    info!("Root folder: {}", config.root_folder.display());
    info!("Songs directory: {}", config.songs_dir.display());

    RootFolderInitializer::new(config.root_folder.clone())
        .ensure_directory_exists()
        .context("Failed to create root folder")?;

    let db = povlao_common::db::init_database(&config.database_path)
        .await
        .context("Failed to open catalog database")?;

    let catalog = Arc::new(CatalogCache::new());
    catalog
        .reload(&db)
        .await
        .context("Failed to load catalog")?;

    let state = AppState::new(
        Arc::clone(&catalog),
        config.recent_capacity,
        config.feedback_path.clone(),
        config.leaderboard_path.clone(),
        config.songs_dir.clone(),
    );

    if config.skip_ingest {
        info!("Ingestion skipped, serving existing catalog");
    } else {
        let job = build_ingest_job(&config, db);
        tokio::spawn(async move {
            if let Err(e) = job.run_and_reload(&catalog).await {
                error!(error = %e, "Catalog ingestion failed");
            }
        });
    }

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

fn build_ingest_job(config: &ServerConfig, db: sqlx::SqlitePool) -> CatalogIngestJob {
    let job = CatalogIngestJob::new(
        db,
        IngestConfig {
            songs_dir: config.songs_dir.clone(),
            extensions: config.audio_extensions.clone(),
            concurrency: config.ingest_concurrency,
        },
        CoverArt::load(&config.placeholder_cover),
    );

    let Some(credentials) = config.spotify.clone() else {
        info!("No Spotify credentials, popularity enrichment disabled");
        return job;
    };

    match SpotifyPopularity::new(credentials, config.enrichment_timeout) {
        Ok(client) => job.with_popularity(Arc::new(client) as Arc<dyn PopularitySource>),
        Err(e) => {
            warn!(error = %e, "Popularity enrichment disabled");
            job
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

//! Configuration loading and root folder resolution
//!
//! Values are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing TOML file never stops startup: a warning is logged and the
//! compiled defaults apply.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directory name used under the platform config/data directories
pub const APP_DIR_NAME: &str = "povlao-guess";

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "POVLAO_ROOT_FOLDER";

/// Compiled fallback values
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub ingest_concurrency: usize,
    pub recent_capacity: usize,
    pub enrichment_timeout_secs: u64,
    pub audio_extensions: Vec<String>,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let root_folder = dirs::data_local_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("./povlao_data"));

        Self {
            root_folder,
            host: "0.0.0.0".to_string(),
            port: 5240,
            log_level: "info".to_string(),
            ingest_concurrency: 10,
            recent_capacity: 200,
            enrichment_timeout_secs: 10,
            audio_extensions: vec!["mp3".to_string()],
        }
    }
}

/// Spotify credentials section of the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub songs_dir: Option<PathBuf>,
    pub placeholder_cover: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub ingest_concurrency: Option<usize>,
    pub recent_capacity: Option<usize>,
    pub enrichment_timeout_secs: Option<u64>,
    pub audio_extensions: Option<Vec<String>>,
    #[serde(default)]
    pub spotify: SpotifyConfig,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Platform config file location (`<config_dir>/povlao-guess/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// Load the TOML config file
///
/// `explicit` takes precedence over the platform location. A missing file
/// yields the empty config; a file that exists but does not parse is an error.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => path,
        None => {
            warn!("Could not determine config directory, using compiled defaults");
            return Ok(TomlConfig::default());
        }
    };

    if !path.exists() {
        warn!("Config file not found: {}, using compiled defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let config = TomlConfig::parse(&content)?;
    info!("Loaded config file: {}", path.display());
    Ok(config)
}

/// Resolves the root folder holding the database and JSON stores
pub struct RootFolderResolver<'a> {
    cli_arg: Option<&'a Path>,
    env_var_name: &'a str,
    toml: &'a TomlConfig,
}

impl<'a> RootFolderResolver<'a> {
    pub fn new(cli_arg: Option<&'a Path>, toml: &'a TomlConfig) -> Self {
        Self {
            cli_arg,
            env_var_name: ROOT_FOLDER_ENV,
            toml,
        }
    }

    /// Override the environment variable consulted (tests)
    pub fn with_env_var(mut self, name: &'a str) -> Self {
        self.env_var_name = name;
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = self.cli_arg {
            return path.to_path_buf();
        }

        if let Ok(path) = std::env::var(self.env_var_name) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml.root_folder {
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder and derives the file locations inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Catalog database
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join("manifest.db")
    }

    /// Default songs directory
    pub fn songs_dir(&self) -> PathBuf {
        self.root_folder.join("songs")
    }

    /// Append-only feedback document
    pub fn feedback_path(&self) -> PathBuf {
        self.root_folder.join("feedback.json")
    }

    /// Best-score leaderboard document
    pub fn leaderboard_path(&self) -> PathBuf {
        self.root_folder.join("scores.json")
    }

    /// Default placeholder cover image
    pub fn placeholder_cover_path(&self) -> PathBuf {
        self.root_folder.join("placeholder-cover.jpg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_toml() {
        let config = TomlConfig::parse(
            r#"
            port = 6000
            audio_extensions = ["mp3", "flac"]

            [spotify]
            client_id = "abc"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, Some(6000));
        assert_eq!(config.audio_extensions.unwrap(), vec!["mp3", "flac"]);
        assert_eq!(config.spotify.client_id.as_deref(), Some("abc"));
        assert!(config.spotify.client_secret.is_none());
        assert!(config.root_folder.is_none());
    }

    #[test]
    fn test_parse_malformed_toml_is_config_error() {
        let err = TomlConfig::parse("port = [").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_initializer_paths() {
        let init = RootFolderInitializer::new(PathBuf::from("/srv/povlao"));
        assert_eq!(init.database_path(), PathBuf::from("/srv/povlao/manifest.db"));
        assert_eq!(init.songs_dir(), PathBuf::from("/srv/povlao/songs"));
        assert_eq!(init.leaderboard_path(), PathBuf::from("/srv/povlao/scores.json"));
    }

    #[test]
    fn test_compiled_defaults() {
        let defaults = CompiledDefaults::for_current_platform();
        assert_eq!(defaults.port, 5240);
        assert_eq!(defaults.ingest_concurrency, 10);
        assert_eq!(defaults.recent_capacity, 200);
        assert!(defaults.root_folder.ends_with(APP_DIR_NAME) || defaults.root_folder.ends_with("povlao_data"));
    }
}

//! Songs directory listing
//!
//! Lists the top level of the songs directory, keeps files whose extension
//! is one of the configured audio extensions (case-insensitive) and records
//! each file's modification time in milliseconds since the epoch. Audio files
//! that are listed but cannot be stat'ed are reported by name so callers can
//! tell them apart from files that are gone.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use walkdir::WalkDir;

/// Directory scan errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Directory could not be read
    #[error("I/O error: {0}")]
    IoError(String),
}

/// One audio file found by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Bare file name, the catalog key
    pub name: String,
    pub path: PathBuf,
    /// Modification time, ms since epoch
    pub modified: i64,
}

/// Result of one directory listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub files: Vec<ScannedFile>,
    /// Audio file names present in the directory without a readable mtime
    pub unreadable: Vec<String>,
}

pub struct FileScanner {
    extensions: Vec<String>,
}

impl FileScanner {
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn scan(&self, root_path: &Path) -> Result<ScanResult, ScanError> {
        if !root_path.exists() {
            return Err(ScanError::PathNotFound(root_path.to_path_buf()));
        }

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory(root_path.to_path_buf()));
        }

        // Reading the directory itself must succeed; individual entries may fail
        std::fs::read_dir(root_path).map_err(|e| ScanError::IoError(e.to_string()))?;

        let mut result = ScanResult::default();
        let walker = WalkDir::new(root_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                    if let Some(name) = e.path().and_then(|p| self.audio_file_name(p)) {
                        result.unreadable.push(name.to_string());
                    }
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = self.audio_file_name(entry.path()) else {
                continue;
            };

            let modified = match entry.metadata().map(|m| m.modified()) {
                Ok(Ok(time)) => DateTime::<Utc>::from(time).timestamp_millis(),
                Ok(Err(e)) => {
                    tracing::warn!("No modification time for {}: {}", name, e);
                    result.unreadable.push(name.to_string());
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Cannot stat {}: {}", name, e);
                    result.unreadable.push(name.to_string());
                    continue;
                }
            };

            result.files.push(ScannedFile {
                name: name.to_string(),
                path: entry.path().to_path_buf(),
                modified,
            });
        }

        tracing::debug!(
            "Scan complete: {} audio files ({} unreadable) in {}",
            result.files.len(),
            result.unreadable.len(),
            root_path.display()
        );
        Ok(result)
    }

    /// UTF-8 file name of `path` when it has an audio extension
    fn audio_file_name<'a>(&self, path: &'a Path) -> Option<&'a str> {
        if !self.is_audio_file(path) {
            return None;
        }
        let name = path.file_name().and_then(|n| n.to_str());
        if name.is_none() {
            tracing::warn!("Skipping non UTF-8 file name: {}", path.display());
        }
        name
    }

    fn is_audio_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|known| known.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scanner() -> FileScanner {
        FileScanner::new(&["mp3".to_string()])
    }

    #[test]
    fn test_missing_directory() {
        let result = scanner().scan(Path::new("/nonexistent/povlao/songs"));
        assert!(matches!(result, Err(ScanError::PathNotFound(_))));
    }

    #[test]
    fn test_file_instead_of_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.mp3");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(scanner().scan(&file), Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn test_lists_top_level_audio_files_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("B - Two.mp3"), b"x").unwrap();
        fs::write(dir.path().join("A - One.MP3"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("C - Three.mp3"), b"x").unwrap();

        let scan = scanner().scan(dir.path()).unwrap();
        let names: Vec<&str> = scan.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["A - One.MP3", "B - Two.mp3"]);
        assert!(scan.files.iter().all(|f| f.modified > 0));
        assert!(scan.unreadable.is_empty());
    }

    #[test]
    fn test_extensions_accept_leading_dot() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("song.flac"), b"x").unwrap();
        let scan = FileScanner::new(&[".FLAC".to_string()]).scan(dir.path()).unwrap();
        assert_eq!(scan.files.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_unstatable_audio_file_is_reported_not_dropped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("A - One.mp3"), b"x").unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("missing-target"),
            dir.path().join("B - Dangling.mp3"),
        )
        .unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("missing-target"),
            dir.path().join("dangling.txt"),
        )
        .unwrap();

        let scan = scanner().scan(dir.path()).unwrap();
        let names: Vec<&str> = scan.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["A - One.mp3"]);
        assert_eq!(scan.unreadable, vec!["B - Dangling.mp3".to_string()]);
    }
}

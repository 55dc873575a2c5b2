//! File-backed JSON stores

pub mod feedback;
pub mod leaderboard;

pub use feedback::{FeedbackEntry, FeedbackStore};
pub use leaderboard::LeaderboardStore;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read a JSON document, `None` when the file does not exist or is blank
async fn read_document<T: DeserializeOwned>(path: &Path) -> povlao_common::Result<Option<T>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if content.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&content)?))
}

/// Replace a JSON document via a temporary sibling file
async fn write_document<T: Serialize>(path: &Path, value: &T) -> povlao_common::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let content = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, content).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

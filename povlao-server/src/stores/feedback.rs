//! Append-only feedback log

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{read_document, write_document};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub id: Uuid,
    pub category: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Feedback kept as a JSON array in one file
pub struct FeedbackStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FeedbackStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub async fn entries(&self) -> povlao_common::Result<Vec<FeedbackEntry>> {
        let _guard = self.lock.lock().await;
        Ok(read_document(&self.path).await?.unwrap_or_default())
    }

    pub async fn append(
        &self,
        category: &str,
        message: &str,
    ) -> povlao_common::Result<FeedbackEntry> {
        let _guard = self.lock.lock().await;
        let mut entries: Vec<FeedbackEntry> = read_document(&self.path).await?.unwrap_or_default();

        let entry = FeedbackEntry {
            id: Uuid::new_v4(),
            category: category.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        };
        entries.push(entry.clone());
        write_document(&self.path, &entries).await?;

        tracing::info!(id = %entry.id, category = %entry.category, "Feedback recorded");
        Ok(entry)
    }
}

//! Best-streak leaderboard
//!
//! Stored as a JSON object mapping username to best score. A submission only
//! replaces the stored score when it is strictly greater.

use std::collections::BTreeMap;
use std::path::PathBuf;

use povlao_common::api::types::LeaderboardEntry;
use serde_json::Number;
use tokio::sync::Mutex;

use super::{read_document, write_document};

type Scores = BTreeMap<String, Number>;

fn value(score: &Number) -> f64 {
    score.as_f64().unwrap_or(0.0)
}

pub struct LeaderboardStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LeaderboardStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// All entries, best score first, ties by username
    pub async fn entries(&self) -> povlao_common::Result<Vec<LeaderboardEntry>> {
        let _guard = self.lock.lock().await;
        let scores: Scores = read_document(&self.path).await?.unwrap_or_default();

        let mut entries: Vec<LeaderboardEntry> = scores
            .into_iter()
            .map(|(username, score)| LeaderboardEntry { username, score })
            .collect();
        // BTreeMap order is by username, so a stable sort keeps ties ordered
        entries.sort_by(|a, b| value(&b.score).total_cmp(&value(&a.score)));
        Ok(entries)
    }

    /// Record `score` for `username`; returns whether the board changed
    pub async fn submit(&self, username: &str, score: Number) -> povlao_common::Result<bool> {
        let _guard = self.lock.lock().await;
        let mut scores: Scores = read_document(&self.path).await?.unwrap_or_default();

        if let Some(best) = scores.get(username) {
            if value(&score) <= value(best) {
                tracing::debug!(username, "Score not above personal best");
                return Ok(false);
            }
        }

        tracing::info!(username, score = %score, "New best score");
        scores.insert(username.to_string(), score);
        write_document(&self.path, &scores).await?;
        Ok(true)
    }
}

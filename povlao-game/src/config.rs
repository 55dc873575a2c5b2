//! Game engine configuration
//!
//! Deserializable from the `[game]` table of a TOML file.

use serde::Deserialize;

use crate::error::GameResult;
use crate::round::SkipPolicy;
use crate::schedule::{RevealSchedule, RevealStep};

fn default_api_base_url() -> String {
    "http://localhost:5240/".to_string()
}

fn default_username() -> String {
    "Guest".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// Catalog server base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Name streaks are reported under
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default)]
    pub skip_policy: SkipPolicy,
    /// Custom reveal steps; the standard schedule when absent
    #[serde(default)]
    pub reveal_steps: Option<Vec<RevealStep>>,
}

impl GameConfig {
    /// Validated reveal schedule
    pub fn schedule(&self) -> GameResult<RevealSchedule> {
        match &self.reveal_steps {
            Some(steps) => RevealSchedule::new(steps.clone()),
            None => Ok(RevealSchedule::default()),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            username: default_username(),
            skip_policy: SkipPolicy::default(),
            reveal_steps: None,
        }
    }
}

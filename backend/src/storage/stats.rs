use std::sync::Arc;

use super::{KeyValueStore, Result};
use crate::models::Statistics;

/// Loads and saves per-profile word-guess statistics.
///
/// Values are stored as JSON under `<key_prefix>:<profile>`. Anything that
/// cannot be read back as a valid record is treated as absent.
#[derive(Clone)]
pub struct StatsRepository {
    store: Arc<dyn KeyValueStore>,
    key_prefix: String,
}

impl StatsRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
        }
    }

    pub fn key_for(&self, profile: &str) -> String {
        format!("{}:{}", self.key_prefix, profile)
    }

    /// Load statistics, defaulting to all zeros on missing, corrupt or
    /// unreadable data
    pub async fn load(&self, profile: &str) -> Statistics {
        let key = self.key_for(profile);
        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Statistics::default(),
            Err(e) => {
                tracing::warn!("Failed to read statistics for {}: {}", key, e);
                return Statistics::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!("Discarding malformed statistics under {}: {}", key, e);
                Statistics::default()
            }
        }
    }

    pub async fn save(&self, profile: &str, stats: &Statistics) -> Result<()> {
        let json = serde_json::to_string(stats)?;
        self.store.set(&self.key_for(profile), &json).await
    }
}

//! Key-value persistence behind the word-guess statistics.
//!
//! The page only ever needs "get by key" and "set by key", so stores are kept
//! to that contract. [`MemoryStore`] backs tests and database-less runs,
//! [`PgStore`] persists to PostgreSQL.

pub mod memory;
pub mod postgres;
pub mod stats;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use stats::StatsRepository;

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Store whose every call fails, for exercising the error paths
#[cfg(test)]
pub struct FailingStore;

#[cfg(test)]
#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(StorageError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(StorageError::Database(sqlx::Error::PoolTimedOut))
    }
}

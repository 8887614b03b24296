use async_trait::async_trait;
use sqlx::PgPool;

use super::{KeyValueStore, Result};
use crate::db;

/// PostgreSQL-backed store using the `kv_store` table
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueStore for PgStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(db::queries::get_value(&self.pool, key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        db::queries::set_value(&self.pool, key, value).await?;
        Ok(())
    }
}

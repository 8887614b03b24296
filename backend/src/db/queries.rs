use sqlx::{PgPool, Result};

// Key-value queries backing the statistics store

pub async fn get_value(pool: &PgPool, key: &str) -> Result<Option<String>> {
    let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = $1")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(value)
}

pub async fn set_value(pool: &PgPool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO kv_store (key, value)
        VALUES ($1, $2)
        ON CONFLICT (key)
        DO UPDATE SET
            value = $2,
            updated_at = NOW()
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    tracing::debug!("Stored value for key {}", key);

    Ok(())
}

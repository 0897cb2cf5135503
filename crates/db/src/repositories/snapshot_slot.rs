use crate::models::DbSnapshotSlot;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn get_slot(pool: &Pool<Postgres>, slot: &str) -> Result<Option<DbSnapshotSlot>> {
    tracing::debug!("Loading snapshot slot: {}", slot);

    let row = sqlx::query_as::<_, DbSnapshotSlot>(
        r#"
        SELECT slot, value, updated_at
        FROM snapshot_slots
        WHERE slot = $1
        "#,
    )
    .bind(slot)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn upsert_slot(
    pool: &Pool<Postgres>,
    slot: &str,
    value: &serde_json::Value,
) -> Result<DbSnapshotSlot> {
    let now = Utc::now();

    tracing::debug!("Writing snapshot slot: {}", slot);

    let row = sqlx::query_as::<_, DbSnapshotSlot>(
        r#"
        INSERT INTO snapshot_slots (slot, value, updated_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (slot)
        DO UPDATE SET value = $2, updated_at = $3
        RETURNING slot, value, updated_at
        "#,
    )
    .bind(slot)
    .bind(value)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn list_slots(pool: &Pool<Postgres>) -> Result<Vec<String>> {
    let slots = sqlx::query_scalar::<_, String>(
        r#"
        SELECT slot
        FROM snapshot_slots
        ORDER BY slot
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

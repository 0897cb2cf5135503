use std::collections::HashMap;

use async_trait::async_trait;
use eyre::Result;
use rollcall_core::persistence::SnapshotStore;
use tokio::sync::RwLock;

use crate::{repositories::snapshot_slot, DbPool};

/// Snapshot slots stored as JSONB rows in Postgres.
#[derive(Debug, Clone)]
pub struct PgSnapshotStore {
    pool: DbPool,
}

impl PgSnapshotStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotStore for PgSnapshotStore {
    async fn load(&self, slot: &str) -> Result<Option<serde_json::Value>> {
        let row = snapshot_slot::get_slot(&self.pool, slot).await?;
        Ok(row.map(|r| r.value))
    }

    async fn save(&self, slot: &str, value: serde_json::Value) -> Result<()> {
        snapshot_slot::upsert_slot(&self.pool, slot, &value).await?;
        Ok(())
    }
}

/// Snapshot slots kept in process memory. Lost on exit.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slots: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self, slot: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.slots.read().await.get(slot).cloned())
    }

    async fn save(&self, slot: &str, value: serde_json::Value) -> Result<()> {
        self.slots.write().await.insert(slot.to_string(), value);
        Ok(())
    }
}

//! Snapshot persistence contract.
//!
//! The engine's durable state is written to a key-value store under named
//! slots. The engine does not know the storage medium; a [`SnapshotStore`]
//! only has to hand back exactly what it was given.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::{AttendanceError, AttendanceResult};
use crate::models::{attendance::AttendanceRecord, settings::AttendanceSettings};

pub const RECORDS_SLOT: &str = "attendance-records";
pub const SETTINGS_SLOT: &str = "attendance-settings";

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self, slot: &str) -> eyre::Result<Option<serde_json::Value>>;

    async fn save(&self, slot: &str, value: serde_json::Value) -> eyre::Result<()>;
}

/// Everything the engine persists between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    pub records: Vec<AttendanceRecord>,
    pub settings: AttendanceSettings,
}

impl EngineSnapshot {
    /// Reads both slots. Missing slots fall back to empty records and
    /// default settings.
    pub async fn load_from(store: &dyn SnapshotStore) -> AttendanceResult<Option<Self>> {
        let records = store.load(RECORDS_SLOT).await?;
        let settings = store.load(SETTINGS_SLOT).await?;

        if records.is_none() && settings.is_none() {
            return Ok(None);
        }

        let records = match records {
            Some(v) => serde_json::from_value(v).map_err(|e| {
                AttendanceError::Persistence(eyre::eyre!("corrupt {} slot: {}", RECORDS_SLOT, e))
            })?,
            None => Vec::new(),
        };
        let settings = match settings {
            Some(v) => serde_json::from_value(v).map_err(|e| {
                AttendanceError::Persistence(eyre::eyre!("corrupt {} slot: {}", SETTINGS_SLOT, e))
            })?,
            None => AttendanceSettings::default(),
        };

        Ok(Some(Self { records, settings }))
    }

    pub async fn save_records(
        store: &dyn SnapshotStore,
        records: &[AttendanceRecord],
    ) -> AttendanceResult<()> {
        let value = serde_json::to_value(records).map_err(|e| AttendanceError::Internal(Box::new(e)))?;
        store.save(RECORDS_SLOT, value).await?;
        Ok(())
    }

    pub async fn save_settings(
        store: &dyn SnapshotStore,
        settings: &AttendanceSettings,
    ) -> AttendanceResult<()> {
        let value = serde_json::to_value(settings).map_err(|e| AttendanceError::Internal(Box::new(e)))?;
        store.save(SETTINGS_SLOT, value).await?;
        Ok(())
    }

    pub async fn save_to(&self, store: &dyn SnapshotStore) -> AttendanceResult<()> {
        Self::save_records(store, &self.records).await?;
        Self::save_settings(store, &self.settings).await
    }
}

use tracing::debug;

use crate::models::{attendance::AttendanceRecord, query::RecordFilter};

/// Saved attendance records, at most one per composite key.
///
/// Records are kept in storage order: a replaced record moves to the end,
/// the same way a fresh save would land there.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<AttendanceRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrates a store. Later duplicates of a key replace earlier ones.
    pub fn from_records(records: Vec<AttendanceRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.upsert(record);
        }
        store
    }

    /// Inserts `record`, replacing any record with the same composite key.
    /// A replaced record keeps its original `created_at`. Returns the stored
    /// record.
    pub fn upsert(&mut self, mut record: AttendanceRecord) -> &AttendanceRecord {
        let key = record.key();
        if let Some(pos) = self.records.iter().position(|r| r.key() == key) {
            let previous = self.records.remove(pos);
            record.created_at = previous.created_at;
            debug!("Replacing attendance record {}", record.id);
        } else {
            debug!("Inserting attendance record {}", record.id);
        }
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Looks a record up by its rendered id. Ids are not guaranteed unique
    /// (see [`RecordKey`](crate::models::attendance::RecordKey)); the most
    /// recently stored match wins.
    pub fn get(&self, id: &str) -> Option<&AttendanceRecord> {
        self.records.iter().rev().find(|r| r.id == id)
    }

    /// Matching records, most recent date first. Records sharing a date
    /// keep their storage order.
    pub fn query(&self, filter: &RecordFilter) -> Vec<&AttendanceRecord> {
        let mut matched: Vec<&AttendanceRecord> =
            self.records.iter().filter(|r| filter.matches(r)).collect();
        matched.sort_by(|a, b| b.date.cmp(&a.date));
        matched
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

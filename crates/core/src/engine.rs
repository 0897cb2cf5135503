//! The attendance engine: session manager, record store, statistics and
//! settings bundled into one explicit context object.
//!
//! Nothing here is global. Each [`AttendanceEngine`] owns its own state, so
//! tests and tenants can run independent instances side by side.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::errors::{AttendanceError, AttendanceResult};
use crate::models::attendance::{
    AttendanceMethod, AttendanceRecord, AttendanceSession, AttendanceStatus, CapturedMark,
    GeoPoint, MarkOutcome, StatusUpdate,
};
use crate::models::query::{DateRange, RecordFilter};
use crate::models::settings::{AttendanceSettings, SettingsPatch};
use crate::models::stats::{ClassAttendanceStats, DashboardSummary, StudentAttendanceStats};
use crate::persistence::EngineSnapshot;
use crate::qr::{self, QrPayload};
use crate::roster::Roster;
use crate::session::SessionManager;
use crate::stats;
use crate::store::RecordStore;

pub struct AttendanceEngine {
    roster: Arc<dyn Roster>,
    clock: Arc<dyn Clock>,
    sessions: SessionManager,
    store: RecordStore,
    settings: AttendanceSettings,
}

impl AttendanceEngine {
    pub fn new(roster: Arc<dyn Roster>, clock: Arc<dyn Clock>) -> Self {
        Self {
            roster,
            clock,
            sessions: SessionManager::new(),
            store: RecordStore::new(),
            settings: AttendanceSettings::default(),
        }
    }

    /// Builds an engine from previously persisted state.
    pub fn from_snapshot(
        roster: Arc<dyn Roster>,
        clock: Arc<dyn Clock>,
        snapshot: EngineSnapshot,
    ) -> Self {
        let store = RecordStore::from_records(snapshot.records);
        info!("Restored {} attendance records", store.len());
        Self {
            roster,
            clock,
            sessions: SessionManager::new(),
            store,
            settings: snapshot.settings,
        }
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            records: self.store.records().to_vec(),
            settings: self.settings.clone(),
        }
    }

    pub fn roster(&self) -> &dyn Roster {
        self.roster.as_ref()
    }

    // --- session management ---

    /// Opens a session for today. Any unsaved session is discarded.
    pub fn open_session(
        &mut self,
        class_id: &str,
        subject: &str,
        period: u32,
        teacher_id: &str,
    ) -> &AttendanceSession {
        let now = self.clock.now();
        let students: Vec<_> = self
            .roster
            .list_students_by_class(class_id)
            .into_iter()
            .filter(|s| s.is_active)
            .collect();
        if students.is_empty() {
            warn!("Opening session for class {} with no active students", class_id);
        }

        self.sessions
            .open(class_id, subject, period, teacher_id, &students, now)
    }

    pub fn current_session(&self) -> Option<&AttendanceSession> {
        self.sessions.current()
    }

    pub fn mark_status(
        &mut self,
        student_id: &str,
        status: AttendanceStatus,
        method: AttendanceMethod,
    ) -> MarkOutcome {
        let now = self.clock.now();
        self.sessions.mark(student_id, status, method, now)
    }

    pub fn mark_captured(&mut self, capture: &CapturedMark) -> MarkOutcome {
        let now = self.clock.now();
        self.sessions.mark_captured(capture, now)
    }

    pub fn bulk_mark_status(&mut self, updates: &[StatusUpdate]) -> usize {
        let now = self.clock.now();
        self.sessions.bulk_mark(updates, now)
    }

    pub fn annotate_session(
        &mut self,
        notes: Option<String>,
        location: Option<GeoPoint>,
    ) -> AttendanceResult<&AttendanceSession> {
        self.sessions.annotate(notes, location)
    }

    /// Persists the open session into the record store, replacing any
    /// record with the same composite key, and closes the session.
    pub fn save_session(&mut self) -> AttendanceResult<AttendanceRecord> {
        let now = self.clock.now();
        let record = self.sessions.finish(now)?;
        let saved = self.store.upsert(record).clone();
        info!(
            "Saved attendance record {} with {} entries",
            saved.id,
            saved.records.len()
        );
        Ok(saved)
    }

    pub fn discard_session(&mut self) -> bool {
        self.sessions.discard().is_some()
    }

    // --- QR attendance ---

    /// Issues the payload to embed in a QR code for the open session.
    pub fn issue_qr_payload(&self, ttl: Option<Duration>) -> AttendanceResult<QrPayload> {
        let session = self
            .sessions
            .current()
            .ok_or(AttendanceError::NoOpenSession)?;
        let payload = QrPayload::issue(
            session.id,
            self.clock.now(),
            ttl.unwrap_or_else(qr::default_ttl),
        )?;
        debug!("Issued QR payload for session {}", session.id);
        Ok(payload)
    }

    /// Marks `student_id` present from a scanned payload. Malformed or
    /// expired payloads are rejected and leave the session untouched.
    pub fn process_qr_attendance(
        &mut self,
        raw_payload: &str,
        student_id: &str,
    ) -> AttendanceResult<MarkOutcome> {
        let now = self.clock.now();
        let payload = QrPayload::parse(raw_payload).inspect_err(|e| {
            warn!("Rejected QR scan for student {}: {}", student_id, e);
        })?;
        payload.check_fresh(now).inspect_err(|e| {
            warn!("Rejected QR scan for student {}: {}", student_id, e);
        })?;

        Ok(self
            .sessions
            .mark(student_id, AttendanceStatus::Present, AttendanceMethod::Qr, now))
    }

    // --- records ---

    pub fn records(&self) -> &[AttendanceRecord] {
        self.store.records()
    }

    pub fn query_records(&self, filter: &RecordFilter) -> Vec<&AttendanceRecord> {
        self.store.query(filter)
    }

    pub fn get_record(&self, id: &str) -> Option<&AttendanceRecord> {
        self.store.get(id)
    }

    /// Loads records produced outside a session, such as seeded history.
    pub fn import_records(&mut self, records: Vec<AttendanceRecord>) -> usize {
        let count = records.len();
        for record in records {
            self.store.upsert(record);
        }
        debug!("Imported {} attendance records", count);
        count
    }

    // --- statistics ---

    pub fn student_stats(
        &self,
        student_id: &str,
        range: Option<&DateRange>,
    ) -> StudentAttendanceStats {
        stats::student_stats(self.store.records(), student_id, range)
    }

    pub fn class_stats(&self, class_id: &str, range: Option<&DateRange>) -> ClassAttendanceStats {
        let students = self.roster.list_students_by_class(class_id);
        stats::class_stats(
            self.store.records(),
            &students,
            class_id,
            range,
            self.settings.notification_settings.low_attendance_threshold,
        )
    }

    pub fn dashboard_summary(&self) -> DashboardSummary {
        stats::dashboard_summary(
            self.store.records(),
            &self.roster.list_students(),
            self.roster.list_classes().len(),
            self.clock.now().date_naive(),
            self.settings.minimum_attendance_percentage,
        )
    }

    // --- settings ---

    pub fn settings(&self) -> &AttendanceSettings {
        &self.settings
    }

    pub fn update_settings(&mut self, patch: &SettingsPatch) -> AttendanceResult<&AttendanceSettings> {
        self.settings.apply(patch)?;
        info!("Attendance settings updated");
        Ok(&self.settings)
    }
}

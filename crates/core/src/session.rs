//! Lifecycle of the single in-flight attendance session.
//!
//! Opening a session always replaces whatever unsaved session was open
//! before it (last write wins). Marking against a missing session or an
//! unknown student is tolerated and reported through [`MarkOutcome`].

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::errors::{AttendanceError, AttendanceResult};
use crate::models::attendance::{
    AttendanceMethod, AttendanceRecord, AttendanceSession, AttendanceStatus, CapturedMark,
    GeoPoint, MarkOutcome, StatusUpdate, StudentAttendance,
};
use crate::models::roster::Student;

#[derive(Debug, Default)]
pub struct SessionManager {
    current: Option<AttendanceSession>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&AttendanceSession> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Starts a session dated to `now`, seeding one absent entry per
    /// student. An unsaved session that was already open is dropped.
    pub fn open(
        &mut self,
        class_id: &str,
        subject: &str,
        period: u32,
        teacher_id: &str,
        students: &[Student],
        now: DateTime<Utc>,
    ) -> &AttendanceSession {
        let session = AttendanceSession {
            id: Uuid::new_v4(),
            class_id: class_id.to_string(),
            subject: subject.to_string(),
            date: now.date_naive(),
            period,
            teacher_id: teacher_id.to_string(),
            records: students
                .iter()
                .map(|s| StudentAttendance::absent(s.id.clone(), now))
                .collect(),
            method: AttendanceMethod::Manual,
            location: None,
            notes: None,
            opened_at: now,
        };

        debug!(
            "Opening session {}: class={}, subject={}, period={}, students={}",
            session.id,
            class_id,
            subject,
            period,
            session.records.len()
        );

        if let Some(prev) = self.current.take() {
            debug!("Discarding unsaved session {} ({})", prev.id, prev.key());
        }
        &*self.current.insert(session)
    }

    pub fn mark(
        &mut self,
        student_id: &str,
        status: AttendanceStatus,
        method: AttendanceMethod,
        now: DateTime<Utc>,
    ) -> MarkOutcome {
        self.mark_with_confidence(student_id, status, method, None, now)
    }

    /// Records a mark produced by a capture collaborator, keeping its
    /// confidence score.
    pub fn mark_captured(&mut self, capture: &CapturedMark, now: DateTime<Utc>) -> MarkOutcome {
        self.mark_with_confidence(
            &capture.student_id,
            capture.status,
            capture.method,
            capture.confidence,
            now,
        )
    }

    fn mark_with_confidence(
        &mut self,
        student_id: &str,
        status: AttendanceStatus,
        method: AttendanceMethod,
        confidence: Option<f32>,
        now: DateTime<Utc>,
    ) -> MarkOutcome {
        let Some(session) = self.current.as_mut() else {
            return MarkOutcome::NoOpenSession;
        };
        let Some(entry) = session
            .records
            .iter_mut()
            .find(|r| r.student_id == student_id)
        else {
            debug!("Ignoring mark for unknown student {}", student_id);
            return MarkOutcome::UnknownStudent;
        };

        entry.status = status;
        entry.method = method;
        entry.timestamp = now;
        entry.confidence = confidence;
        debug!("Marked student {} as {:?} via {:?}", student_id, status, method);
        MarkOutcome::Marked
    }

    /// Applies every update with method `bulk`. Returns how many session
    /// entries changed; updates for unknown students are skipped.
    pub fn bulk_mark(&mut self, updates: &[StatusUpdate], now: DateTime<Utc>) -> usize {
        let Some(session) = self.current.as_mut() else {
            return 0;
        };

        let mut updated = 0;
        for entry in session.records.iter_mut() {
            // the last update for a student wins
            if let Some(update) = updates.iter().rev().find(|u| u.student_id == entry.student_id) {
                entry.status = update.status;
                entry.method = AttendanceMethod::Bulk;
                entry.timestamp = now;
                entry.confidence = None;
                updated += 1;
            }
        }
        debug!("Bulk marked {} of {} entries", updated, updates.len());
        updated
    }

    pub fn annotate(
        &mut self,
        notes: Option<String>,
        location: Option<GeoPoint>,
    ) -> AttendanceResult<&AttendanceSession> {
        let session = self.current.as_mut().ok_or(AttendanceError::NoOpenSession)?;
        if notes.is_some() {
            session.notes = notes;
        }
        if location.is_some() {
            session.location = location;
        }
        Ok(&*session)
    }

    /// Turns the open session into a record and closes it.
    pub fn finish(&mut self, now: DateTime<Utc>) -> AttendanceResult<AttendanceRecord> {
        let session = self.current.as_ref().ok_or(AttendanceError::NoOpenSession)?;
        if session.class_id.trim().is_empty() {
            return Err(AttendanceError::MissingClass);
        }

        let record = AttendanceRecord {
            id: session.key().to_string(),
            class_id: session.class_id.clone(),
            subject: session.subject.clone(),
            date: session.date,
            period: session.period,
            teacher_id: session.teacher_id.clone(),
            records: session.records.clone(),
            method: session.method,
            location: session.location,
            notes: session.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        self.current = None;
        Ok(record)
    }

    pub fn discard(&mut self) -> Option<AttendanceSession> {
        let discarded = self.current.take();
        if let Some(session) = &discarded {
            debug!("Discarded session {}", session.id);
        }
        discarded
    }
}

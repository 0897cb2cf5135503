use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    /// Present and late both count towards the attendance rate.
    pub fn counts_as_attended(self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceMethod {
    #[default]
    Manual,
    Qr,
    Biometric,
    Face,
    Gps,
    Bulk,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

/// One student's row inside a session or a saved record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttendance {
    pub student_id: String,
    pub status: AttendanceStatus,
    pub timestamp: DateTime<Utc>,
    pub method: AttendanceMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StudentAttendance {
    pub fn absent(student_id: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            student_id: student_id.into(),
            status: AttendanceStatus::Absent,
            timestamp: at,
            method: AttendanceMethod::Manual,
            confidence: None,
            location: None,
            notes: None,
        }
    }
}

/// Identity of a saved record: `(classId, subject, date, period)`.
///
/// The `Display` form joins the parts with `-` and is used as the record id.
/// It is not injective when class ids or subjects contain `-` themselves
/// (class `1-A` with subject `B` renders like class `1` with subject `A-B`),
/// so the store matches records on the structured key, never on the id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub class_id: String,
    pub subject: String,
    pub date: NaiveDate,
    pub period: u32,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.class_id,
            self.subject,
            self.date.format("%Y-%m-%d"),
            self.period
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub class_id: String,
    pub subject: String,
    pub date: NaiveDate,
    pub period: u32,
    pub teacher_id: String,
    pub records: Vec<StudentAttendance>,
    pub method: AttendanceMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttendanceRecord {
    pub fn key(&self) -> RecordKey {
        RecordKey {
            class_id: self.class_id.clone(),
            subject: self.subject.clone(),
            date: self.date,
            period: self.period,
        }
    }

    pub fn entry_for(&self, student_id: &str) -> Option<&StudentAttendance> {
        self.records.iter().find(|r| r.student_id == student_id)
    }

    /// Number of entries marked present or late.
    pub fn attended_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status.counts_as_attended())
            .count()
    }

    /// Present-rate of this single record, 0 when it has no entries.
    pub fn attendance_rate(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.attended_count() as f64 / self.records.len() as f64 * 100.0
    }
}

/// An attendance-taking activity that has been opened but not yet saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSession {
    pub id: Uuid,
    pub class_id: String,
    pub subject: String,
    pub date: NaiveDate,
    pub period: u32,
    pub teacher_id: String,
    pub records: Vec<StudentAttendance>,
    pub method: AttendanceMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub opened_at: DateTime<Utc>,
}

impl AttendanceSession {
    pub fn key(&self) -> RecordKey {
        RecordKey {
            class_id: self.class_id.clone(),
            subject: self.subject.clone(),
            date: self.date,
            period: self.period,
        }
    }

    pub fn entry_for(&self, student_id: &str) -> Option<&StudentAttendance> {
        self.records.iter().find(|r| r.student_id == student_id)
    }
}

/// Result of a marking call. Unknown students and a missing session are
/// tolerated rather than treated as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkOutcome {
    Marked,
    NoOpenSession,
    UnknownStudent,
}

/// A mark produced by a capture collaborator (QR scanner, face or
/// biometric reader).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedMark {
    pub student_id: String,
    pub status: AttendanceStatus,
    pub method: AttendanceMethod,
    #[serde(default)]
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub student_id: String,
    pub status: AttendanceStatus,
}

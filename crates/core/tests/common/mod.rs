#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use fake::{faker::name::en::Name, Fake};
use rollcall_core::{
    clock::FixedClock,
    models::{
        attendance::{AttendanceMethod, AttendanceRecord, AttendanceStatus, StudentAttendance},
        roster::{Class, Student},
    },
    roster::InMemoryRoster,
    AttendanceEngine,
};

pub fn opening_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn student(id: &str, class_id: &str) -> Student {
    Student {
        id: id.to_string(),
        roll_no: format!("2024{:0>3}", id),
        name: Name().fake(),
        email: None,
        class_id: class_id.to_string(),
        parent_ids: vec![],
        is_active: true,
        created_at: opening_time(),
        updated_at: opening_time(),
    }
}

pub fn class(id: &str, students: &[&str]) -> Class {
    Class {
        id: id.to_string(),
        name: format!("Class {}", id),
        section: None,
        grade: "10".to_string(),
        subjects: vec!["Mathematics".to_string(), "Physics".to_string()],
        teacher_id: "2".to_string(),
        students: students.iter().map(|s| s.to_string()).collect(),
        schedule: vec![],
        created_at: opening_time(),
        updated_at: opening_time(),
    }
}

/// Class "1" with students "1" and "2", class "2" with student "5".
pub fn roster() -> InMemoryRoster {
    InMemoryRoster::new(
        vec![class("1", &["1", "2"]), class("2", &["5"])],
        vec![student("1", "1"), student("2", "1"), student("5", "2")],
    )
}

pub fn engine_with_clock() -> (AttendanceEngine, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(opening_time()));
    let engine = AttendanceEngine::new(Arc::new(roster()), clock.clone());
    (engine, clock)
}

pub fn record(
    class_id: &str,
    subject: &str,
    date: NaiveDate,
    period: u32,
    entries: &[(&str, AttendanceStatus)],
) -> AttendanceRecord {
    let at = opening_time();
    AttendanceRecord {
        id: format!("{}-{}-{}-{}", class_id, subject, date.format("%Y-%m-%d"), period),
        class_id: class_id.to_string(),
        subject: subject.to_string(),
        date,
        period,
        teacher_id: "2".to_string(),
        records: entries
            .iter()
            .map(|(id, status)| {
                let mut entry = StudentAttendance::absent(*id, at);
                entry.status = *status;
                entry
            })
            .collect(),
        method: AttendanceMethod::Manual,
        location: None,
        notes: None,
        created_at: at,
        updated_at: at,
    }
}

//! Demo roster and randomly generated attendance history.
//!
//! Used to give a fresh install something to show on the dashboard.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;
use rollcall_core::models::{
    attendance::{AttendanceMethod, AttendanceRecord, AttendanceStatus, RecordKey, StudentAttendance},
    roster::{Class, ClassSchedule, Student},
};
use rollcall_core::roster::{InMemoryRoster, Roster};

/// Share of generated entries marked present.
const PRESENT_PROBABILITY: f64 = 0.85;

fn slot(day: &str, subject: &str, start: &str, end: &str, room: &str) -> ClassSchedule {
    ClassSchedule {
        day: day.to_string(),
        subject: subject.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        room: Some(room.to_string()),
    }
}

fn student(id: &str, name: &str, email: &str, class_id: &str, parents: &[&str], at: DateTime<Utc>) -> Student {
    Student {
        id: id.to_string(),
        roll_no: format!("2024{:0>3}", id),
        name: name.to_string(),
        email: Some(email.to_string()),
        class_id: class_id.to_string(),
        parent_ids: parents.iter().map(|p| p.to_string()).collect(),
        is_active: true,
        created_at: at,
        updated_at: at,
    }
}

/// Two classes with six students between them.
pub fn demo_roster(now: DateTime<Utc>) -> InMemoryRoster {
    let strings = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    let classes = vec![
        Class {
            id: "1".to_string(),
            name: "Grade 10 - Section A".to_string(),
            section: Some("A".to_string()),
            grade: "10".to_string(),
            subjects: strings(&["Mathematics", "Physics", "Chemistry", "English", "Biology"]),
            teacher_id: "2".to_string(),
            students: strings(&["1", "2", "3", "4"]),
            schedule: vec![
                slot("Monday", "Mathematics", "09:00", "10:00", "R101"),
                slot("Monday", "Physics", "10:00", "11:00", "Lab1"),
                slot("Tuesday", "Chemistry", "09:00", "10:00", "Lab2"),
            ],
            created_at: now,
            updated_at: now,
        },
        Class {
            id: "2".to_string(),
            name: "Grade 11 - Science".to_string(),
            section: Some("Science".to_string()),
            grade: "11".to_string(),
            subjects: strings(&["Advanced Math", "Physics", "Chemistry", "Biology"]),
            teacher_id: "2".to_string(),
            students: strings(&["5", "6"]),
            schedule: vec![],
            created_at: now,
            updated_at: now,
        },
    ];

    let students = vec![
        student("1", "Alice Johnson", "alice@student.edu", "1", &["4"], now),
        student("2", "Bob Smith", "bob@student.edu", "1", &[], now),
        student("3", "Carol Davis", "carol@student.edu", "1", &[], now),
        student("4", "David Wilson", "david@student.edu", "1", &[], now),
        student("5", "Eva Brown", "eva@student.edu", "2", &[], now),
        student("6", "Frank Miller", "frank@student.edu", "2", &[], now),
    ];

    InMemoryRoster::new(classes, students)
}

fn random_status<R: Rng>(rng: &mut R) -> AttendanceStatus {
    if rng.gen_bool(PRESENT_PROBABILITY) {
        AttendanceStatus::Present
    } else if rng.gen_bool(0.5) {
        AttendanceStatus::Absent
    } else {
        AttendanceStatus::Late
    }
}

/// Generates `days` days of history ending on `today`: for every class,
/// one record for each of its first two subjects, in periods 1 and 2.
pub fn sample_records<R: Rng>(
    roster: &dyn Roster,
    today: NaiveDate,
    days: u32,
    rng: &mut R,
) -> Vec<AttendanceRecord> {
    let mut records = Vec::new();

    for offset in 0..days {
        let date = today - Duration::days(i64::from(offset));
        let midnight = date.and_time(chrono::NaiveTime::MIN).and_utc();

        for class in roster.list_classes() {
            let students = roster.list_students_by_class(&class.id);

            for (index, subject) in class.subjects.iter().take(2).enumerate() {
                let period = index as u32 + 1;
                let marked_at = midnight + Duration::hours(8 + i64::from(period));
                let key = RecordKey {
                    class_id: class.id.clone(),
                    subject: subject.clone(),
                    date,
                    period,
                };

                records.push(AttendanceRecord {
                    id: key.to_string(),
                    class_id: class.id.clone(),
                    subject: subject.clone(),
                    date,
                    period,
                    teacher_id: class.teacher_id.clone(),
                    records: students
                        .iter()
                        .map(|s| StudentAttendance {
                            status: random_status(rng),
                            ..StudentAttendance::absent(s.id.clone(), marked_at)
                        })
                        .collect(),
                    method: AttendanceMethod::Manual,
                    location: None,
                    notes: None,
                    created_at: marked_at,
                    updated_at: marked_at,
                });
            }
        }
    }

    tracing::info!("Generated {} sample attendance records", records.len());
    records
}

//! Statistics derived from saved attendance records.
//!
//! Every function here is total: empty inputs produce zero rates rather
//! than errors.

use chrono::{Datelike, NaiveDate};

use crate::models::attendance::{AttendanceRecord, AttendanceStatus, StudentAttendance};
use crate::models::query::DateRange;
use crate::models::roster::Student;
use crate::models::stats::{
    ClassAttendanceStats, DailyStat, DashboardSummary, StudentAttendanceStats, Trend,
};

/// Entries compared in each trend window.
pub const TREND_WINDOW: usize = 10;
/// Percentage points the recent window must move to count as a trend.
pub const TREND_MARGIN: f64 = 5.0;
/// Number of per-record points kept in a class time series.
pub const DAILY_STATS_LIMIT: usize = 30;

fn in_range(record: &AttendanceRecord, range: Option<&DateRange>) -> bool {
    range.is_none_or(|r| r.contains(record.date))
}

/// Share of `entries` marked present or late, as a percentage. 0 for an
/// empty slice.
pub fn attended_rate(entries: &[&StudentAttendance]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let attended = entries
        .iter()
        .filter(|e| e.status.counts_as_attended())
        .count();
    attended as f64 / entries.len() as f64 * 100.0
}

/// The student's entries within range, most recent `(date, period)` first.
/// Records without an entry for the student are skipped.
pub fn student_entries<'a>(
    records: &'a [AttendanceRecord],
    student_id: &str,
    range: Option<&DateRange>,
) -> Vec<&'a StudentAttendance> {
    let mut found: Vec<(NaiveDate, u32, &StudentAttendance)> = records
        .iter()
        .filter(|r| in_range(r, range))
        .filter_map(|r| r.entry_for(student_id).map(|e| (r.date, r.period, e)))
        .collect();
    found.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
    found.into_iter().map(|(_, _, e)| e).collect()
}

/// Compares the most recent window against the one before it. An empty
/// window counts as a rate of 0.
pub fn trend(entries_newest_first: &[&StudentAttendance]) -> Trend {
    let recent_end = entries_newest_first.len().min(TREND_WINDOW);
    let older_end = entries_newest_first.len().min(TREND_WINDOW * 2);
    let recent = attended_rate(&entries_newest_first[..recent_end]);
    let older = attended_rate(&entries_newest_first[recent_end..older_end]);

    if recent > older + TREND_MARGIN {
        Trend::Improving
    } else if recent < older - TREND_MARGIN {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

pub fn student_stats(
    records: &[AttendanceRecord],
    student_id: &str,
    range: Option<&DateRange>,
) -> StudentAttendanceStats {
    let entries = student_entries(records, student_id, range);
    let count = |status: AttendanceStatus| entries.iter().filter(|e| e.status == status).count();

    let present_count = count(AttendanceStatus::Present);
    let absent_count = count(AttendanceStatus::Absent);
    let late_count = count(AttendanceStatus::Late);
    let excused_count = count(AttendanceStatus::Excused);

    StudentAttendanceStats {
        total_sessions: present_count + absent_count + late_count + excused_count,
        present_count,
        absent_count,
        late_count,
        excused_count,
        attendance_rate: attended_rate(&entries),
        trend: trend(&entries),
    }
}

/// Statistics for one class. `students` is the class roster; only active
/// students are checked against `low_attendance_threshold`.
pub fn class_stats(
    records: &[AttendanceRecord],
    students: &[Student],
    class_id: &str,
    range: Option<&DateRange>,
    low_attendance_threshold: f64,
) -> ClassAttendanceStats {
    let mut matching: Vec<&AttendanceRecord> = records
        .iter()
        .filter(|r| r.class_id == class_id && in_range(r, range))
        .collect();

    let (total_present, total_possible) = matching.iter().fold((0usize, 0usize), |acc, r| {
        (acc.0 + r.attended_count(), acc.1 + r.records.len())
    });
    let average_attendance_rate = if total_possible > 0 {
        total_present as f64 / total_possible as f64 * 100.0
    } else {
        0.0
    };

    matching.sort_by_key(|r| (r.date, r.period));
    let skip = matching.len().saturating_sub(DAILY_STATS_LIMIT);
    let daily_stats = matching[skip..]
        .iter()
        .map(|r| DailyStat {
            date: r.date,
            rate: r.attendance_rate(),
        })
        .collect();

    let students_at_risk = students
        .iter()
        .filter(|s| s.class_id == class_id && s.is_active)
        .filter(|s| {
            student_stats(records, &s.id, range).attendance_rate < low_attendance_threshold
        })
        .map(|s| s.id.clone())
        .collect();

    ClassAttendanceStats {
        total_sessions: matching.len(),
        average_attendance_rate,
        students_at_risk,
        daily_stats,
    }
}

/// Headline figures for the dashboard as of `today`.
pub fn dashboard_summary(
    records: &[AttendanceRecord],
    students: &[Student],
    total_classes: usize,
    today: NaiveDate,
    minimum_attendance_percentage: f64,
) -> DashboardSummary {
    let month_start = today.with_day(1).unwrap_or(today);

    let today_attendance = records.iter().filter(|r| r.date == today).count();
    let monthly_attendance = records.iter().filter(|r| r.date >= month_start).count();

    let (present, possible) = records.iter().fold((0usize, 0usize), |acc, r| {
        (acc.0 + r.attended_count(), acc.1 + r.records.len())
    });
    let average = if possible > 0 {
        present as f64 / possible as f64 * 100.0
    } else {
        0.0
    };

    let students_at_risk = students
        .iter()
        .filter(|s| {
            student_stats(records, &s.id, None).attendance_rate < minimum_attendance_percentage
        })
        .count();

    DashboardSummary {
        total_students: students.len(),
        total_classes,
        today_attendance,
        monthly_attendance,
        average_attendance_rate: average.round() as u32,
        students_at_risk,
    }
}

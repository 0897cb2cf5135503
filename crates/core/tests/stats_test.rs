mod common;

use chrono::{Duration, NaiveDate};
use pretty_assertions::assert_eq;
use rstest::rstest;
use rollcall_core::{
    models::{
        attendance::{AttendanceRecord, AttendanceStatus},
        query::DateRange,
        stats::Trend,
    },
    stats::{class_stats, student_stats, DAILY_STATS_LIMIT},
};

use common::{day, record, student};

/// One single-student record per day, oldest first, ending on 2024-05-31.
fn history(statuses: &[AttendanceStatus]) -> Vec<AttendanceRecord> {
    let last = day(2024, 5, 31);
    let first = last - Duration::days(statuses.len() as i64 - 1);
    statuses
        .iter()
        .enumerate()
        .map(|(i, status)| {
            record(
                "1",
                "Mathematics",
                first + Duration::days(i as i64),
                1,
                &[("1", *status)],
            )
        })
        .collect()
}

#[test]
fn test_no_entries_gives_zero_rate() {
    let stats = student_stats(&[], "1", None);

    assert_eq!(stats.total_sessions, 0);
    assert_eq!(stats.attendance_rate, 0.0);
    assert!(!stats.attendance_rate.is_nan());
    assert_eq!(stats.trend, Trend::Stable);
}

#[test]
fn test_counts_and_rate() {
    use AttendanceStatus::*;
    let records = history(&[Present, Late, Absent, Excused]);

    let stats = student_stats(&records, "1", None);

    assert_eq!(
        (
            stats.present_count,
            stats.late_count,
            stats.absent_count,
            stats.excused_count
        ),
        (1, 1, 1, 1)
    );
    assert_eq!(stats.total_sessions, 4);
    assert_eq!(stats.attendance_rate, 50.0);
}

#[test]
fn test_records_without_student_are_skipped() {
    let mut records = history(&[AttendanceStatus::Present]);
    records.push(record(
        "1",
        "Physics",
        day(2024, 5, 31),
        2,
        &[("2", AttendanceStatus::Absent)],
    ));

    let stats = student_stats(&records, "1", None);

    assert_eq!(stats.total_sessions, 1);
    assert_eq!(stats.attendance_rate, 100.0);
}

#[test]
fn test_sudden_absences_read_as_declining() {
    use AttendanceStatus::*;
    // three present days, then nine absences: the recent window of ten holds
    // a single present against two in the older window
    let mut statuses = vec![Present, Present, Present];
    statuses.extend(std::iter::repeat_n(Absent, 9));
    let records = history(&statuses);

    let stats = student_stats(&records, "1", None);

    assert_eq!(stats.total_sessions, 12);
    assert_eq!(stats.trend, Trend::Declining);
}

#[rstest]
#[case(&[AttendanceStatus::Absent; 10], &[AttendanceStatus::Present; 10], Trend::Improving)]
#[case(&[AttendanceStatus::Present; 10], &[AttendanceStatus::Present; 10], Trend::Stable)]
#[case(&[AttendanceStatus::Present; 10], &[AttendanceStatus::Late; 10], Trend::Stable)]
fn test_trend_windows(
    #[case] older: &[AttendanceStatus],
    #[case] recent: &[AttendanceStatus],
    #[case] expected: Trend,
) {
    let statuses: Vec<_> = older.iter().chain(recent).copied().collect();

    assert_eq!(student_stats(&history(&statuses), "1", None).trend, expected);
}

#[test]
fn test_entries_older_than_twenty_are_ignored_by_trend() {
    use AttendanceStatus::*;
    let mut statuses = vec![Absent; 15];
    statuses.extend(std::iter::repeat_n(Present, 20));

    let stats = student_stats(&history(&statuses), "1", None);

    assert_eq!(stats.trend, Trend::Stable);
    assert_eq!(stats.total_sessions, 35);
}

#[test]
fn test_date_range_is_inclusive() {
    use AttendanceStatus::*;
    let records = history(&[Absent, Present, Present, Absent]);
    let range = DateRange::new(day(2024, 5, 29), day(2024, 5, 30));

    let stats = student_stats(&records, "1", Some(&range));

    assert_eq!(stats.total_sessions, 2);
    assert_eq!(stats.attendance_rate, 100.0);
}

#[test]
fn test_class_average_and_daily_points() {
    use AttendanceStatus::*;
    let records = vec![
        record("1", "Physics", day(2024, 5, 7), 1, &[("1", Present), ("2", Present)]),
        record("1", "Mathematics", day(2024, 5, 6), 2, &[("1", Late), ("2", Absent)]),
        record("1", "Mathematics", day(2024, 5, 6), 1, &[("1", Absent), ("2", Absent)]),
        record("2", "Physics", day(2024, 5, 6), 1, &[("5", Present)]),
    ];
    let students = vec![student("1", "1"), student("2", "1")];

    let stats = class_stats(&records, &students, "1", None, 70.0);

    assert_eq!(stats.total_sessions, 3);
    assert_eq!(stats.average_attendance_rate, 50.0);
    assert_eq!(
        stats
            .daily_stats
            .iter()
            .map(|d| (d.date, d.rate))
            .collect::<Vec<(NaiveDate, f64)>>(),
        vec![
            (day(2024, 5, 6), 0.0),
            (day(2024, 5, 6), 50.0),
            (day(2024, 5, 7), 100.0),
        ]
    );
    // student 1: 2 of 3 attended, student 2: 1 of 3
    assert_eq!(stats.students_at_risk, vec!["1", "2"]);
}

#[test]
fn test_daily_points_keep_most_recent_thirty() {
    let statuses = vec![AttendanceStatus::Present; 45];
    let records = history(&statuses);

    let stats = class_stats(&records, &[], "1", None, 70.0);

    assert_eq!(stats.total_sessions, 45);
    assert_eq!(stats.daily_stats.len(), DAILY_STATS_LIMIT);
    assert_eq!(stats.daily_stats.last().unwrap().date, day(2024, 5, 31));
    assert_eq!(stats.daily_stats[0].date, day(2024, 5, 2));
}

#[test]
fn test_empty_class_has_zero_average() {
    let stats = class_stats(&[], &[student("1", "1")], "1", None, 70.0);

    assert_eq!(stats.total_sessions, 0);
    assert_eq!(stats.average_attendance_rate, 0.0);
    assert!(stats.daily_stats.is_empty());
    assert_eq!(stats.students_at_risk, vec!["1"]);
}

#[test]
fn test_inactive_students_are_not_at_risk() {
    let mut inactive = student("2", "1");
    inactive.is_active = false;

    let stats = class_stats(&[], &[inactive], "1", None, 70.0);

    assert!(stats.students_at_risk.is_empty());
}

mod common;

use chrono::Duration;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use rollcall_core::{
    models::{attendance::AttendanceStatus, query::RecordFilter},
    store::RecordStore,
};

use common::{day, record};

#[fixture]
fn store() -> RecordStore {
    RecordStore::from_records(vec![
        record(
            "1",
            "Mathematics",
            day(2024, 5, 2),
            1,
            &[("1", AttendanceStatus::Present), ("2", AttendanceStatus::Absent)],
        ),
        record(
            "2",
            "Physics",
            day(2024, 5, 6),
            1,
            &[("5", AttendanceStatus::Late)],
        ),
        record(
            "1",
            "Physics",
            day(2024, 5, 4),
            2,
            &[("1", AttendanceStatus::Excused), ("2", AttendanceStatus::Present)],
        ),
        record(
            "1",
            "Mathematics",
            day(2024, 5, 6),
            1,
            &[("1", AttendanceStatus::Present), ("2", AttendanceStatus::Present)],
        ),
    ])
}

fn ids(records: Vec<&rollcall_core::models::attendance::AttendanceRecord>) -> Vec<String> {
    records.into_iter().map(|r| r.id.clone()).collect()
}

#[rstest]
fn test_query_without_filter_sorts_by_date_descending(store: RecordStore) {
    let all = store.query(&RecordFilter::default());

    assert_eq!(
        ids(all),
        vec![
            "2-Physics-2024-05-06-1",
            "1-Mathematics-2024-05-06-1",
            "1-Physics-2024-05-04-2",
            "1-Mathematics-2024-05-02-1",
        ]
    );
}

#[rstest]
fn test_query_by_class(store: RecordStore) {
    let matched = store.query(&RecordFilter::for_class("1"));

    assert_eq!(matched.len(), 3);
    assert!(matched.iter().all(|r| r.class_id == "1"));
}

#[rstest]
#[case(RecordFilter { subject: Some("Physics".into()), ..Default::default() }, 2)]
#[case(RecordFilter { student_id: Some("5".into()), ..Default::default() }, 1)]
#[case(RecordFilter { status: Some(AttendanceStatus::Absent), ..Default::default() }, 1)]
#[case(RecordFilter { status: Some(AttendanceStatus::Excused), class_id: Some("2".into()), ..Default::default() }, 0)]
#[case(RecordFilter { start_date: Some(day(2024, 5, 4)), end_date: Some(day(2024, 5, 4)), ..Default::default() }, 1)]
#[case(RecordFilter { start_date: Some(day(2024, 5, 3)), ..Default::default() }, 3)]
fn test_query_filters(store: RecordStore, #[case] filter: RecordFilter, #[case] expected: usize) {
    assert_eq!(store.query(&filter).len(), expected);
}

#[rstest]
fn test_upsert_replaces_by_key(mut store: RecordStore) {
    let mut replacement = record(
        "1",
        "Mathematics",
        day(2024, 5, 2),
        1,
        &[("1", AttendanceStatus::Absent), ("2", AttendanceStatus::Absent)],
    );
    let original_created = store.get("1-Mathematics-2024-05-02-1").unwrap().created_at;
    replacement.created_at = original_created + Duration::days(3);
    replacement.updated_at = replacement.created_at;

    store.upsert(replacement);

    assert_eq!(store.len(), 4);
    let stored = store.get("1-Mathematics-2024-05-02-1").unwrap();
    assert_eq!(stored.attended_count(), 0);
    assert_eq!(stored.created_at, original_created);
    assert_eq!(store.records().last().unwrap().id, stored.id);
}

#[test]
fn test_rehydration_collapses_duplicates() {
    let first = record("1", "Mathematics", day(2024, 5, 2), 1, &[("1", AttendanceStatus::Absent)]);
    let second = record("1", "Mathematics", day(2024, 5, 2), 1, &[("1", AttendanceStatus::Present)]);

    let store = RecordStore::from_records(vec![first, second]);

    assert_eq!(store.len(), 1);
    assert_eq!(store.records()[0].attended_count(), 1);
}

#[test]
fn test_dashed_keys_with_equal_ids_stay_distinct() {
    let dashed_class = record("1-A", "B", day(2024, 5, 2), 1, &[("1", AttendanceStatus::Present)]);
    let dashed_subject = record("1", "A-B", day(2024, 5, 2), 1, &[("1", AttendanceStatus::Absent)]);
    assert_eq!(dashed_class.id, dashed_subject.id);

    let mut store = RecordStore::new();
    store.upsert(dashed_class);
    store.upsert(dashed_subject);

    assert_eq!(store.len(), 2);
    assert_eq!(
        store.query(&RecordFilter::for_class("1-A"))[0].subject,
        "B"
    );
}

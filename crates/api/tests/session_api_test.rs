mod test_utils;

use axum::http::StatusCode;
use chrono::Duration;
use pretty_assertions::assert_eq;
use rollcall_core::{
    models::{
        attendance::{AttendanceRecord, AttendanceSession, AttendanceStatus, MarkOutcome},
        requests::{BulkMarkResponse, DiscardSessionResponse, IssueQrResponse, MarkStatusResponse},
        stats::ClassAttendanceStats,
    },
    persistence::{SnapshotStore, RECORDS_SLOT},
};
use serde_json::json;

use crate::test_utils::TestContext;

fn open_request() -> serde_json::Value {
    json!({
        "classId": "1",
        "subject": "Mathematics",
        "period": 1,
        "teacherId": "2"
    })
}

async fn open_session(ctx: &TestContext) -> AttendanceSession {
    let response = ctx.server.post("/api/sessions").json(&open_request()).await;
    response.assert_status_ok();
    response.json::<AttendanceSession>()
}

fn status_of(session: &AttendanceSession, student_id: &str) -> AttendanceStatus {
    session.entry_for(student_id).unwrap().status
}

#[tokio::test]
async fn test_health_reports_session_state() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["openSession"], false);

    open_session(&ctx).await;
    let response = ctx.server.get("/health").await;
    assert_eq!(response.json::<serde_json::Value>()["openSession"], true);
}

#[tokio::test]
async fn test_open_session_seeds_every_student_absent() {
    let ctx = TestContext::new();

    let session = open_session(&ctx).await;

    assert_eq!(session.class_id, "1");
    assert_eq!(session.records.len(), 4);
    assert!(session
        .records
        .iter()
        .all(|r| r.status == AttendanceStatus::Absent));
}

#[tokio::test]
async fn test_open_session_rejects_blank_class() {
    let ctx = TestContext::new();
    let mut request = open_request();
    request["classId"] = json!("  ");

    let response = ctx.server.post("/api/sessions").json(&request).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mark_save_and_query_flow() {
    let ctx = TestContext::new();
    open_session(&ctx).await;

    let response = ctx
        .server
        .post("/api/sessions/current/marks")
        .json(&json!({ "studentId": "1", "status": "present" }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<MarkStatusResponse>().outcome,
        MarkOutcome::Marked
    );

    let response = ctx.server.post("/api/sessions/current/save").await;
    response.assert_status_ok();
    let record = response.json::<AttendanceRecord>();
    assert_eq!(record.id, "1-Mathematics-2024-05-06-1");
    assert_eq!(record.attended_count(), 1);

    // Saving closes the session
    ctx.server
        .get("/api/sessions/current")
        .await
        .assert_status(StatusCode::CONFLICT);

    let response = ctx
        .server
        .get("/api/records")
        .add_query_param("classId", "1")
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Vec<AttendanceRecord>>(), vec![record.clone()]);

    let response = ctx.server.get(&format!("/api/records/{}", record.id)).await;
    response.assert_status_ok();

    let stats = ctx
        .server
        .get("/api/stats/classes/1")
        .await
        .json::<ClassAttendanceStats>();
    assert_eq!(stats.total_sessions, 1);
    assert_eq!(stats.average_attendance_rate, 25.0);

    let persisted = ctx.snapshots.load(RECORDS_SLOT).await.unwrap().unwrap();
    assert_eq!(persisted.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_marking_without_session_is_tolerated() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/sessions/current/marks")
        .json(&json!({ "studentId": "1", "status": "late" }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<MarkStatusResponse>().outcome,
        MarkOutcome::NoOpenSession
    );
}

#[tokio::test]
async fn test_unknown_student_is_reported_not_rejected() {
    let ctx = TestContext::new();
    open_session(&ctx).await;

    let response = ctx
        .server
        .post("/api/sessions/current/marks")
        .json(&json!({ "studentId": "99", "status": "present" }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<MarkStatusResponse>().outcome,
        MarkOutcome::UnknownStudent
    );
}

#[tokio::test]
async fn test_save_without_session_conflicts() {
    let ctx = TestContext::new();

    let response = ctx.server.post("/api/sessions/current/save").await;

    response.assert_status(StatusCode::CONFLICT);
    assert!(response.json::<serde_json::Value>()["error"].is_string());
}

#[tokio::test]
async fn test_bulk_mark_and_discard() {
    let ctx = TestContext::new();
    open_session(&ctx).await;

    let response = ctx
        .server
        .post("/api/sessions/current/bulk")
        .json(&json!({
            "entries": [
                { "studentId": "1", "status": "present" },
                { "studentId": "2", "status": "excused" },
                { "studentId": "42", "status": "present" }
            ]
        }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<BulkMarkResponse>().updated, 2);

    let session = ctx
        .server
        .get("/api/sessions/current")
        .await
        .json::<AttendanceSession>();
    assert_eq!(status_of(&session, "2"), AttendanceStatus::Excused);

    let response = ctx.server.delete("/api/sessions/current").await;
    assert!(response.json::<DiscardSessionResponse>().discarded);
    let response = ctx.server.delete("/api/sessions/current").await;
    assert!(!response.json::<DiscardSessionResponse>().discarded);
}

#[tokio::test]
async fn test_annotations_are_kept_on_the_record() {
    let ctx = TestContext::new();
    open_session(&ctx).await;

    let response = ctx
        .server
        .put("/api/sessions/current/annotations")
        .json(&json!({
            "notes": "Fire drill during period",
            "location": { "latitude": 12.97, "longitude": 77.59 }
        }))
        .await;
    response.assert_status_ok();

    let record = ctx
        .server
        .post("/api/sessions/current/save")
        .await
        .json::<AttendanceRecord>();
    assert_eq!(record.notes.as_deref(), Some("Fire drill during period"));
    assert!(record.location.is_some());
}

#[tokio::test]
async fn test_expired_qr_leaves_session_untouched() {
    let ctx = TestContext::new();
    open_session(&ctx).await;

    let issued = ctx
        .server
        .post("/api/sessions/current/qr")
        .await
        .json::<IssueQrResponse>();
    ctx.clock.advance(Duration::minutes(5) + Duration::milliseconds(1));

    let response = ctx
        .server
        .post("/api/sessions/current/qr/scan")
        .json(&json!({ "payload": issued.payload, "studentId": "1" }))
        .await;
    response.assert_status(StatusCode::GONE);

    let session = ctx
        .server
        .get("/api/sessions/current")
        .await
        .json::<AttendanceSession>();
    assert_eq!(status_of(&session, "1"), AttendanceStatus::Absent);
}

#[tokio::test]
async fn test_fresh_qr_marks_present() {
    let ctx = TestContext::new();
    let opened = open_session(&ctx).await;

    let response = ctx
        .server
        .post("/api/sessions/current/qr")
        .json(&json!({ "ttlSeconds": 60 }))
        .await;
    response.assert_status_ok();
    let issued = response.json::<IssueQrResponse>();
    assert_eq!(issued.session_id, opened.id);

    ctx.clock.advance(Duration::seconds(60));
    let response = ctx
        .server
        .post("/api/sessions/current/qr/scan")
        .json(&json!({ "payload": issued.payload, "studentId": "3" }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<MarkStatusResponse>().outcome,
        MarkOutcome::Marked
    );

    let session = ctx
        .server
        .get("/api/sessions/current")
        .await
        .json::<AttendanceSession>();
    assert_eq!(status_of(&session, "3"), AttendanceStatus::Present);
}

#[tokio::test]
async fn test_malformed_qr_is_bad_request() {
    let ctx = TestContext::new();
    open_session(&ctx).await;

    let response = ctx
        .server
        .post("/api/sessions/current/qr/scan")
        .json(&json!({ "payload": "not json", "studentId": "1" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_issue_qr_requires_session() {
    let ctx = TestContext::new();

    let response = ctx.server.post("/api/sessions/current/qr").await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_out_of_range_qr_lifetime_is_rejected_and_service_stays_up() {
    let ctx = TestContext::new();
    open_session(&ctx).await;

    for ttl in [0_u64, 86_401, 9_000_000_000_000_000] {
        ctx.server
            .post("/api/sessions/current/qr")
            .json(&json!({ "ttlSeconds": ttl }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    ctx.server.get("/api/settings").await.assert_status_ok();
    ctx.server.get("/api/sessions/current").await.assert_status_ok();
}

use axum::{extract::State, Json};
use chrono::Duration;
use rollcall_core::{
    errors::AttendanceError,
    qr::MAX_QR_TTL_SECS,
    models::{
        attendance::{AttendanceRecord, AttendanceSession, CapturedMark},
        requests::{
            AnnotateSessionRequest, BulkMarkRequest, BulkMarkResponse, DiscardSessionResponse,
            IssueQrRequest, IssueQrResponse, MarkStatusRequest, MarkStatusResponse,
            OpenSessionRequest, ScanQrRequest,
        },
    },
};
use std::sync::Arc;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn open_session(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<OpenSessionRequest>,
) -> Result<Json<AttendanceSession>, AppError> {
    if payload.class_id.trim().is_empty() {
        return Err(AttendanceError::Validation("classId must not be empty".to_string()).into());
    }

    let mut engine = state.engine()?;
    let session = engine
        .open_session(
            &payload.class_id,
            &payload.subject,
            payload.period,
            &payload.teacher_id,
        )
        .clone();

    Ok(Json(session))
}

#[axum::debug_handler]
pub async fn current_session(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<AttendanceSession>, AppError> {
    let engine = state.engine()?;
    let session = engine
        .current_session()
        .cloned()
        .ok_or(AttendanceError::NoOpenSession)?;

    Ok(Json(session))
}

#[axum::debug_handler]
pub async fn discard_session(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<DiscardSessionResponse>, AppError> {
    let discarded = state.engine()?.discard_session();

    Ok(Json(DiscardSessionResponse { discarded }))
}

#[axum::debug_handler]
pub async fn mark_status(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<MarkStatusRequest>,
) -> Result<Json<MarkStatusResponse>, AppError> {
    let capture = CapturedMark {
        student_id: payload.student_id,
        status: payload.status,
        method: payload.method,
        confidence: payload.confidence,
    };
    let outcome = state.engine()?.mark_captured(&capture);

    Ok(Json(MarkStatusResponse { outcome }))
}

#[axum::debug_handler]
pub async fn bulk_mark(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BulkMarkRequest>,
) -> Result<Json<BulkMarkResponse>, AppError> {
    let mut engine = state.engine()?;
    if engine.current_session().is_none() {
        return Err(AttendanceError::NoOpenSession.into());
    }
    let updated = engine.bulk_mark_status(&payload.entries);

    Ok(Json(BulkMarkResponse { updated }))
}

#[axum::debug_handler]
pub async fn annotate_session(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<AnnotateSessionRequest>,
) -> Result<Json<AttendanceSession>, AppError> {
    let mut engine = state.engine()?;
    let session = engine
        .annotate_session(payload.notes, payload.location)?
        .clone();

    Ok(Json(session))
}

#[axum::debug_handler]
pub async fn save_session(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<AttendanceRecord>, AppError> {
    let _persisting = state.lock_persistence().await;
    let (record, snapshot) = {
        let mut engine = state.engine()?;
        let record = engine.save_session()?;
        (record, engine.snapshot())
    };

    state.persist_records(&snapshot).await?;

    Ok(Json(record))
}

fn requested_ttl(secs: u64) -> Result<Duration, AttendanceError> {
    match i64::try_from(secs) {
        Ok(secs @ 1..=MAX_QR_TTL_SECS) => Ok(Duration::seconds(secs)),
        _ => Err(AttendanceError::Validation(format!(
            "ttlSeconds must be between 1 and {}, got {}",
            MAX_QR_TTL_SECS, secs
        ))),
    }
}

#[axum::debug_handler]
pub async fn issue_qr(
    State(state): State<Arc<ApiState>>,
    payload: Option<Json<IssueQrRequest>>,
) -> Result<Json<IssueQrResponse>, AppError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let ttl = match request.ttl_seconds {
        Some(secs) => requested_ttl(secs)?,
        None => state.qr_ttl,
    };

    let qr = state.engine()?.issue_qr_payload(Some(ttl))?;

    Ok(Json(IssueQrResponse {
        session_id: qr.session_id,
        payload: qr.encode()?,
        expires_at: qr.expires_at()?,
    }))
}

#[axum::debug_handler]
pub async fn scan_qr(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ScanQrRequest>,
) -> Result<Json<MarkStatusResponse>, AppError> {
    let outcome = state
        .engine()?
        .process_qr_attendance(&payload.payload, &payload.student_id)?;

    Ok(Json(MarkStatusResponse { outcome }))
}

use axum::{
    extract::{Path, Query, State},
    Json,
};
use rollcall_core::{
    errors::AttendanceError,
    models::{attendance::AttendanceRecord, query::RecordFilter},
};
use std::sync::Arc;

use crate::{middleware::error_handling::AppError, ApiState};

/// Saved records matching every given filter, newest date first.
#[axum::debug_handler]
pub async fn list_records(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<RecordFilter>,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    let engine = state.engine()?;
    let records = engine
        .query_records(&filter)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(records))
}

#[axum::debug_handler]
pub async fn get_record(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<AttendanceRecord>, AppError> {
    let engine = state.engine()?;
    let record = engine
        .get_record(&id)
        .cloned()
        .ok_or_else(|| AttendanceError::NotFound(format!("Attendance record {} not found", id)))?;

    Ok(Json(record))
}

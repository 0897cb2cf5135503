use axum::{
    extract::{Path, Query, State},
    Json,
};
use rollcall_core::models::{
    query::StatsQuery,
    stats::{ClassAttendanceStats, DashboardSummary, StudentAttendanceStats},
};
use std::sync::Arc;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn student_stats(
    State(state): State<Arc<ApiState>>,
    Path(student_id): Path<String>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StudentAttendanceStats>, AppError> {
    let range = query.date_range()?;
    let stats = state.engine()?.student_stats(&student_id, range.as_ref());

    Ok(Json(stats))
}

#[axum::debug_handler]
pub async fn class_stats(
    State(state): State<Arc<ApiState>>,
    Path(class_id): Path<String>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<ClassAttendanceStats>, AppError> {
    let range = query.date_range()?;
    let stats = state.engine()?.class_stats(&class_id, range.as_ref());

    Ok(Json(stats))
}

#[axum::debug_handler]
pub async fn dashboard(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<DashboardSummary>, AppError> {
    let summary = state.engine()?.dashboard_summary();

    Ok(Json(summary))
}

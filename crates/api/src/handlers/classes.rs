use axum::{
    extract::{Path, State},
    Json,
};
use rollcall_core::{
    errors::AttendanceError,
    models::roster::{Class, Student},
};
use std::sync::Arc;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn list_classes(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Class>>, AppError> {
    let classes = state.engine()?.roster().list_classes();

    Ok(Json(classes))
}

#[axum::debug_handler]
pub async fn list_class_students(
    State(state): State<Arc<ApiState>>,
    Path(class_id): Path<String>,
) -> Result<Json<Vec<Student>>, AppError> {
    let engine = state.engine()?;
    let roster = engine.roster();
    if roster.get_class(&class_id).is_none() {
        return Err(AttendanceError::NotFound(format!("Class {} not found", class_id)).into());
    }

    Ok(Json(roster.list_students_by_class(&class_id)))
}

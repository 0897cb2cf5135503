use axum::{extract::State, Json};
use rollcall_core::models::settings::{AttendanceSettings, SettingsPatch};
use std::sync::Arc;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn get_settings(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<AttendanceSettings>, AppError> {
    let settings = state.engine()?.settings().clone();

    Ok(Json(settings))
}

/// Applies a partial update. A patch that fails validation changes nothing.
#[axum::debug_handler]
pub async fn update_settings(
    State(state): State<Arc<ApiState>>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<AttendanceSettings>, AppError> {
    let _persisting = state.lock_persistence().await;
    let (settings, snapshot) = {
        let mut engine = state.engine()?;
        let settings = engine.update_settings(&patch)?.clone();
        (settings, engine.snapshot())
    };

    state.persist_settings(&snapshot).await?;

    Ok(Json(settings))
}

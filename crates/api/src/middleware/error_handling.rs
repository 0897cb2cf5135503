//! # Error Handling Middleware
//!
//! Maps attendance errors to HTTP status codes and JSON error bodies so every
//! endpoint reports failures the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rollcall_core::errors::AttendanceError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps an `AttendanceError` and implements `IntoResponse`, so
/// handlers can use `?` on engine calls.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use rollcall_api::middleware::error_handling::AppError;
/// use rollcall_core::errors::AttendanceError;
///
/// async fn handler(id: String) -> Result<Json<String>, AppError> {
///     Err(AppError(AttendanceError::NotFound(format!("Record {} not found", id))))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub AttendanceError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AttendanceError::NotFound(_) => StatusCode::NOT_FOUND,
            AttendanceError::Validation(_) => StatusCode::BAD_REQUEST,
            AttendanceError::InvalidQrPayload(_) => StatusCode::BAD_REQUEST,
            AttendanceError::NoOpenSession => StatusCode::CONFLICT,
            AttendanceError::MissingClass => StatusCode::CONFLICT,
            AttendanceError::QrExpired { .. } => StatusCode::GONE,
            AttendanceError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AttendanceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl From<AttendanceError> for AppError {
    fn from(err: AttendanceError) -> Self {
        AppError(err)
    }
}

/// Storage failures surface as persistence errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(AttendanceError::Persistence(err))
    }
}

/// Maps an AttendanceError straight to an HTTP response
pub fn map_error(err: AttendanceError) -> Response {
    AppError(err).into_response()
}

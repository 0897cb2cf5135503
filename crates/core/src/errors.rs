use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No attendance session is open")]
    NoOpenSession,

    #[error("Attendance session has no class")]
    MissingClass,

    #[error("QR code expired at {expired_at}")]
    QrExpired { expired_at: DateTime<Utc> },

    #[error("Invalid QR payload: {0}")]
    InvalidQrPayload(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] eyre::Report),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type AttendanceResult<T> = Result<T, AttendanceError>;

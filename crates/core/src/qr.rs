//! Payload carried by attendance QR codes.
//!
//! Rendering the code image is left to the caller; this module only issues
//! and checks the JSON text that goes inside it.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AttendanceError, AttendanceResult};

pub const DEFAULT_QR_TTL_SECS: i64 = 300;
/// Longest lifetime a caller may request for a payload.
pub const MAX_QR_TTL_SECS: i64 = 24 * 60 * 60;

pub fn default_ttl() -> Duration {
    Duration::seconds(DEFAULT_QR_TTL_SECS)
}

/// Timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub session_id: Uuid,
    pub timestamp: i64,
    pub expiry: i64,
}

impl QrPayload {
    /// Fails when `ttl` is not positive or pushes the expiry past the
    /// representable date range.
    pub fn issue(session_id: Uuid, now: DateTime<Utc>, ttl: Duration) -> AttendanceResult<Self> {
        if ttl <= Duration::zero() {
            return Err(AttendanceError::Validation(
                "QR payload lifetime must be positive".to_string(),
            ));
        }
        let expiry = now.checked_add_signed(ttl).ok_or_else(|| {
            AttendanceError::Validation(format!(
                "QR payload lifetime of {}s is out of range",
                ttl.num_seconds()
            ))
        })?;

        Ok(Self {
            session_id,
            timestamp: now.timestamp_millis(),
            expiry: expiry.timestamp_millis(),
        })
    }

    pub fn parse(raw: &str) -> AttendanceResult<Self> {
        serde_json::from_str(raw).map_err(|e| AttendanceError::InvalidQrPayload(e.to_string()))
    }

    pub fn encode(&self) -> AttendanceResult<String> {
        serde_json::to_string(self).map_err(|e| AttendanceError::Internal(Box::new(e)))
    }

    pub fn expires_at(&self) -> AttendanceResult<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.expiry)
            .single()
            .ok_or_else(|| AttendanceError::InvalidQrPayload(format!("expiry {} out of range", self.expiry)))
    }

    /// Fails once `now` is past the expiry. A scan landing exactly on the
    /// expiry instant is still accepted.
    pub fn check_fresh(&self, now: DateTime<Utc>) -> AttendanceResult<()> {
        if now.timestamp_millis() > self.expiry {
            return Err(AttendanceError::QrExpired {
                expired_at: self.expires_at()?,
            });
        }
        Ok(())
    }
}

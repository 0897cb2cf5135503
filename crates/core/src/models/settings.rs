use serde::{Deserialize, Serialize};

use crate::errors::{AttendanceError, AttendanceResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub parent_alerts: bool,
    pub teacher_digest: bool,
    pub low_attendance_threshold: f64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            parent_alerts: true,
            teacher_digest: true,
            low_attendance_threshold: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSettings {
    /// Minutes late before a student is considered absent.
    pub auto_mark_threshold: u32,
    pub minimum_attendance_percentage: f64,
    pub allow_late_entry: bool,
    pub require_gps_verification: bool,
    pub enable_face_recognition: bool,
    pub enable_qr_code: bool,
    pub notification_settings: NotificationSettings,
}

impl Default for AttendanceSettings {
    fn default() -> Self {
        Self {
            auto_mark_threshold: 15,
            minimum_attendance_percentage: 75.0,
            allow_late_entry: true,
            require_gps_verification: false,
            enable_face_recognition: false,
            enable_qr_code: true,
            notification_settings: NotificationSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NotificationSettingsPatch {
    pub parent_alerts: Option<bool>,
    pub teacher_digest: Option<bool>,
    pub low_attendance_threshold: Option<f64>,
}

/// Partial update of [`AttendanceSettings`]. Every field is optional and
/// unknown fields are rejected when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
    pub auto_mark_threshold: Option<u32>,
    pub minimum_attendance_percentage: Option<f64>,
    pub allow_late_entry: Option<bool>,
    pub require_gps_verification: Option<bool>,
    pub enable_face_recognition: Option<bool>,
    pub enable_qr_code: Option<bool>,
    pub notification_settings: Option<NotificationSettingsPatch>,
}

fn check_percentage(field: &str, value: Option<f64>) -> AttendanceResult<()> {
    match value {
        Some(v) if !(0.0..=100.0).contains(&v) => Err(AttendanceError::Validation(format!(
            "{} must be between 0 and 100, got {}",
            field, v
        ))),
        _ => Ok(()),
    }
}

impl SettingsPatch {
    pub fn validate(&self) -> AttendanceResult<()> {
        check_percentage(
            "minimumAttendancePercentage",
            self.minimum_attendance_percentage,
        )?;
        if let Some(n) = &self.notification_settings {
            check_percentage("lowAttendanceThreshold", n.low_attendance_threshold)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &SettingsPatch::default()
    }
}

impl AttendanceSettings {
    /// Validates the patch and merges it in. Nothing is changed when
    /// validation fails.
    pub fn apply(&mut self, patch: &SettingsPatch) -> AttendanceResult<()> {
        patch.validate()?;

        if let Some(v) = patch.auto_mark_threshold {
            self.auto_mark_threshold = v;
        }
        if let Some(v) = patch.minimum_attendance_percentage {
            self.minimum_attendance_percentage = v;
        }
        if let Some(v) = patch.allow_late_entry {
            self.allow_late_entry = v;
        }
        if let Some(v) = patch.require_gps_verification {
            self.require_gps_verification = v;
        }
        if let Some(v) = patch.enable_face_recognition {
            self.enable_face_recognition = v;
        }
        if let Some(v) = patch.enable_qr_code {
            self.enable_qr_code = v;
        }
        if let Some(n) = &patch.notification_settings {
            let current = &mut self.notification_settings;
            if let Some(v) = n.parent_alerts {
                current.parent_alerts = v;
            }
            if let Some(v) = n.teacher_digest {
                current.teacher_digest = v;
            }
            if let Some(v) = n.low_attendance_threshold {
                current.low_attendance_threshold = v;
            }
        }
        Ok(())
    }
}

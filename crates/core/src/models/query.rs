use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::attendance::{AttendanceRecord, AttendanceStatus};
use crate::errors::{AttendanceError, AttendanceResult};

/// Inclusive calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Optional, combinable filters for the record history. An empty filter
/// matches every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    pub class_id: Option<String>,
    pub subject: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub student_id: Option<String>,
    pub status: Option<AttendanceStatus>,
}

impl RecordFilter {
    pub fn for_class(class_id: impl Into<String>) -> Self {
        Self {
            class_id: Some(class_id.into()),
            ..Default::default()
        }
    }

    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        if let Some(class_id) = &self.class_id {
            if &record.class_id != class_id {
                return false;
            }
        }
        if let Some(subject) = &self.subject {
            if &record.subject != subject {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if record.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if record.date > end {
                return false;
            }
        }
        if let Some(student_id) = &self.student_id {
            if record.entry_for(student_id).is_none() {
                return false;
            }
        }
        if let Some(status) = self.status {
            if !record.records.iter().any(|r| r.status == status) {
                return false;
            }
        }
        true
    }
}

/// Date bounds accepted by the statistics endpoints. Both bounds must be
/// present for the range to apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl StatsQuery {
    pub fn date_range(&self) -> AttendanceResult<Option<DateRange>> {
        match (self.start_date, self.end_date) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) if start <= end => Ok(Some(DateRange::new(start, end))),
            (Some(start), Some(end)) => Err(AttendanceError::Validation(format!(
                "startDate {} is after endDate {}",
                start, end
            ))),
            _ => Err(AttendanceError::Validation(
                "startDate and endDate must be given together".to_string(),
            )),
        }
    }
}

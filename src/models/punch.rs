use super::employee::EmployeeId;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// ISO layout used for every timestamp written to the destination.
pub const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";

/// A punch exactly as read from the time-clock database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPunch {
    pub device_user_id: i64,
    pub timestamp: NaiveDateTime,
}

impl RawPunch {
    pub fn new(device_user_id: i64, timestamp: NaiveDateTime) -> Self {
        Self {
            device_user_id,
            timestamp,
        }
    }
}

/// A punch whose device user id was mapped to an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPunch {
    pub employee_id: EmployeeId,
    pub timestamp: NaiveDateTime,
}

impl ResolvedPunch {
    pub fn new(employee_id: EmployeeId, timestamp: NaiveDateTime) -> Self {
        Self {
            employee_id,
            timestamp,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Row for `attendance_raw`, stamped with the run's recording time.
    pub fn to_log_row(&self, recorded_at: NaiveDateTime) -> RawLogRow {
        RawLogRow {
            employee_id: self.employee_id.clone(),
            check_time: self.timestamp.format(ISO_DATETIME).to_string(),
            created_at: recorded_at.format(ISO_DATETIME).to_string(),
        }
    }
}

/// ⇔ attendance_raw (employee_id, check_time, created_at)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawLogRow {
    pub employee_id: EmployeeId,
    pub check_time: String,
    pub created_at: String,
}

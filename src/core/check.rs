//! Read-only diagnostics over the source and the destination.

use crate::core::identity::{device_code, device_for_code};
use crate::errors::AppResult;
use crate::models::employee::EmployeeRecord;
use crate::models::punch::RawPunch;
use crate::models::summary::SummaryRow;
use crate::source::PunchSource;
use crate::store::AttendanceStore;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Punches recorded on one day.
#[derive(Debug, Clone)]
pub struct DayPunches {
    pub date: NaiveDate,
    pub punches: Vec<RawPunch>,
}

impl DayPunches {
    /// Distinct device user ids, ascending.
    pub fn device_ids(&self) -> Vec<i64> {
        self.punches
            .iter()
            .map(|p| p.device_user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Device ids present that are not on the roster.
    pub fn unmapped_ids(&self) -> Vec<i64> {
        self.device_ids()
            .into_iter()
            .filter(|id| device_code(*id).is_none())
            .collect()
    }
}

/// Stored attendance of one employee.
#[derive(Debug, Clone)]
pub struct EmployeeAttendance {
    pub employee: EmployeeRecord,
    pub device_user_id: Option<i64>,
    pub rows: Vec<SummaryRow>,
}

pub struct CheckLogic;

impl CheckLogic {
    pub fn punches_on(source: &dyn PunchSource, date: NaiveDate) -> AppResult<DayPunches> {
        Ok(DayPunches {
            date,
            punches: source.punches_on(date)?,
        })
    }

    pub fn device_history(
        source: &dyn PunchSource,
        device_user_id: i64,
        limit: usize,
    ) -> AppResult<Vec<RawPunch>> {
        source.punches_for_device(device_user_id, limit)
    }

    /// `None` when the code is not in the directory.
    pub fn employee_attendance(
        store: &dyn AttendanceStore,
        code: &str,
    ) -> AppResult<Option<EmployeeAttendance>> {
        let Some(employee) = store.find_by_code(code)? else {
            return Ok(None);
        };

        let rows = store.summaries_for_employee(&employee.id)?;
        Ok(Some(EmployeeAttendance {
            device_user_id: device_for_code(&employee.employee_code),
            employee,
            rows,
        }))
    }

    pub fn latest(store: &dyn AttendanceStore, limit: usize) -> AppResult<Vec<SummaryRow>> {
        store.latest_summaries(limit)
    }
}

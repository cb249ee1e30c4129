use super::employee::EmployeeId;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Daily attendance record, one per (employee, date).
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub standard_hours: f64,
    pub ot_hours: f64,
}

impl DailySummary {
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn check_in_str(&self) -> Option<String> {
        self.check_in.map(|t| t.format("%H:%M:%S").to_string())
    }

    pub fn check_out_str(&self) -> Option<String> {
        self.check_out.map(|t| t.format("%H:%M:%S").to_string())
    }

    /// Serializable form written to the `attendance` table.
    pub fn to_row(&self) -> SummaryRow {
        SummaryRow {
            employee_id: self.employee_id.clone(),
            date: self.date_str(),
            check_in: self.check_in_str(),
            check_out: self.check_out_str(),
            standard_hours: self.standard_hours,
            ot_hours: self.ot_hours,
        }
    }
}

/// ⇔ attendance (employee_id, date, check_in, check_out, standard_hours, ot_hours)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub employee_id: EmployeeId,
    pub date: String,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub standard_hours: f64,
    pub ot_hours: f64,
}

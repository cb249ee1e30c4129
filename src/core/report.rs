//! Monthly timesheet: per-employee totals over the stored daily summaries.
//!
//! Weekday hours count as standard time and weekday overtime. Hours worked
//! on a day off all count as weekend hours. Overtime is also converted into
//! paid hours at the configured rates.

use crate::core::window::SyncWindow;
use crate::errors::{AppError, AppResult};
use crate::models::employee::{EmployeeId, EmployeeRecord};
use crate::models::summary::SummaryRow;
use crate::store::AttendanceStore;
use crate::utils::date::parse_date;
use chrono::{Datelike, Local, NaiveDate, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A calendar month, `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportMonth {
    first: NaiveDate,
}

impl ReportMonth {
    pub fn parse(s: &str) -> AppResult<Self> {
        let first = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDate(s.to_string()))?;
        Ok(Self { first })
    }

    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            first: today.with_day(1).unwrap_or(today),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first
            .checked_add_months(chrono::Months::new(1))
            .map(|next| next - TimeDelta::days(1))
            .unwrap_or(self.first)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let last = self.last_day();
        self.first.iter_days().take_while(move |d| *d <= last)
    }

    pub fn window(&self) -> SyncWindow {
        SyncWindow::spanning(self.first_day(), self.last_day())
    }

    pub fn label(&self) -> String {
        self.first.format("%Y-%m").to_string()
    }
}

/// Which Saturdays are days off. Sundays always are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaturdayRule {
    Off,
    Working,
    /// Every other Saturday is worked, starting from `working_saturday`.
    Alternate,
}

/// Day-off calendar and overtime conversion rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimesheetPolicy {
    #[serde(default = "default_weekday_ot_rate")]
    pub weekday_ot_rate: f64,
    #[serde(default = "default_weekend_day_rate")]
    pub weekend_day_rate: f64,
    #[serde(default = "default_weekend_ot_rate")]
    pub weekend_ot_rate: f64,
    #[serde(default = "default_saturdays")]
    pub saturdays: SaturdayRule,
    #[serde(default = "default_working_saturday")]
    pub working_saturday: NaiveDate,
}

fn default_weekday_ot_rate() -> f64 {
    1.5
}
fn default_weekend_day_rate() -> f64 {
    2.0
}
fn default_weekend_ot_rate() -> f64 {
    2.5
}
fn default_saturdays() -> SaturdayRule {
    SaturdayRule::Alternate
}
fn default_working_saturday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 13).unwrap_or_default()
}

impl Default for TimesheetPolicy {
    fn default() -> Self {
        Self {
            weekday_ot_rate: default_weekday_ot_rate(),
            weekend_day_rate: default_weekend_day_rate(),
            weekend_ot_rate: default_weekend_ot_rate(),
            saturdays: default_saturdays(),
            working_saturday: default_working_saturday(),
        }
    }
}

impl TimesheetPolicy {
    pub fn validate(&self) -> AppResult<()> {
        let rates = [
            ("weekday_ot_rate", self.weekday_ot_rate),
            ("weekend_day_rate", self.weekend_day_rate),
            ("weekend_ot_rate", self.weekend_ot_rate),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::Config(format!(
                    "timesheet.{name} must be a non-negative number (got {value})"
                )));
            }
        }

        if self.saturdays == SaturdayRule::Alternate
            && self.working_saturday.weekday() != Weekday::Sat
        {
            return Err(AppError::Config(format!(
                "timesheet.working_saturday must be a Saturday (got {})",
                self.working_saturday
            )));
        }
        Ok(())
    }

    pub fn is_day_off(&self, date: NaiveDate) -> bool {
        match date.weekday() {
            Weekday::Sun => true,
            Weekday::Sat => match self.saturdays {
                SaturdayRule::Off => true,
                SaturdayRule::Working => false,
                SaturdayRule::Alternate => {
                    let weeks = (date - self.working_saturday).num_days() / 7;
                    weeks.rem_euclid(2) == 1
                }
            },
            _ => false,
        }
    }
}

/// Hour totals of one employee over the month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthTotals {
    pub days_worked: usize,
    /// Standard hours on working days.
    pub standard_hours: f64,
    /// Overtime on working days.
    pub weekday_ot_hours: f64,
    /// Every hour worked on a day off.
    pub weekend_hours: f64,
    pub converted_ot_hours: f64,
}

impl MonthTotals {
    pub fn add_day(&mut self, standard: f64, ot: f64, day_off: bool, policy: &TimesheetPolicy) {
        if standard + ot > 0.0 {
            self.days_worked += 1;
        }

        if day_off {
            self.weekend_hours += standard + ot;
            self.converted_ot_hours +=
                standard * policy.weekend_day_rate + ot * policy.weekend_ot_rate;
        } else {
            self.standard_hours += standard;
            self.weekday_ot_hours += ot;
            self.converted_ot_hours += ot * policy.weekday_ot_rate;
        }
    }

    /// Standard hours plus converted overtime.
    pub fn total_work(&self) -> f64 {
        self.standard_hours + self.converted_ot_hours
    }
}

/// One line of the timesheet.
#[derive(Debug, Clone)]
pub struct EmployeeMonth {
    pub employee_id: EmployeeId,
    pub code: String,
    pub name: String,
    pub totals: MonthTotals,
    /// (standard, overtime) per day of month.
    pub days: BTreeMap<u32, (f64, f64)>,
}

impl EmployeeMonth {
    /// Cell text for one day: standard hours, then `OT:` on its own line.
    pub fn day_cell(&self, day: u32) -> String {
        let Some((standard, ot)) = self.days.get(&day) else {
            return String::new();
        };

        let mut lines = Vec::new();
        if *standard > 0.0 {
            lines.push(standard.to_string());
        }
        if *ot > 0.0 {
            lines.push(format!("OT:{}", ot));
        }
        lines.join("\n")
    }
}

pub struct ReportLogic;

impl ReportLogic {
    /// Roll the stored summaries of `month` up per employee, ordered by code.
    pub fn monthly(
        store: &dyn AttendanceStore,
        month: &ReportMonth,
        policy: &TimesheetPolicy,
    ) -> AppResult<Vec<EmployeeMonth>> {
        let rows = store.summaries_in_window(&month.window())?;
        let directory: HashMap<EmployeeId, EmployeeRecord> = store
            .fetch_employees()?
            .into_iter()
            .map(|e| (e.id.clone(), e))
            .collect();

        let mut by_employee: BTreeMap<EmployeeId, Vec<SummaryRow>> = BTreeMap::new();
        for row in rows {
            by_employee
                .entry(row.employee_id.clone())
                .or_default()
                .push(row);
        }

        let mut out = Vec::with_capacity(by_employee.len());
        for (employee_id, rows) in by_employee {
            let (code, name) = match directory.get(&employee_id) {
                Some(e) => (e.employee_code.clone(), e.display_name().to_string()),
                None => (employee_id.to_string(), String::new()),
            };

            let mut line = EmployeeMonth {
                employee_id,
                code,
                name,
                totals: MonthTotals::default(),
                days: BTreeMap::new(),
            };

            for row in rows {
                let date =
                    parse_date(&row.date).ok_or_else(|| AppError::InvalidDate(row.date.clone()))?;
                line.totals.add_day(
                    row.standard_hours,
                    row.ot_hours,
                    policy.is_day_off(date),
                    policy,
                );
                line.days
                    .insert(date.day(), (row.standard_hours, row.ot_hours));
            }

            out.push(line);
        }

        out.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(out)
    }
}

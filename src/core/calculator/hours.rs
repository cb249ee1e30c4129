//! Hour arithmetic for a single working day: lunch deduction, the standard
//! hours cap and the overtime gate on checkout time.
//!
//! All rounding is half away from zero at two decimals. Every rounded
//! quantity here is non-negative, so in practice this is round-half-up:
//! 0.125h becomes 0.13h.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Attendance policy knobs. Defaults are the company rule: one hour of lunch
/// is deducted from days longer than four hours, at most eight standard hours
/// are credited, and overtime only counts when the last punch is at or after
/// 18:00.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoursPolicy {
    #[serde(default = "default_lunch_threshold")]
    pub lunch_threshold_hours: f64,
    #[serde(default = "default_lunch_deduction")]
    pub lunch_deduction_hours: f64,
    #[serde(default = "default_standard_cap")]
    pub standard_cap_hours: f64,
    #[serde(default = "default_ot_cutoff_hour")]
    pub ot_cutoff_hour: u32,
}

fn default_lunch_threshold() -> f64 {
    4.0
}
fn default_lunch_deduction() -> f64 {
    1.0
}
fn default_standard_cap() -> f64 {
    8.0
}
fn default_ot_cutoff_hour() -> u32 {
    18
}

impl Default for HoursPolicy {
    fn default() -> Self {
        Self {
            lunch_threshold_hours: default_lunch_threshold(),
            lunch_deduction_hours: default_lunch_deduction(),
            standard_cap_hours: default_standard_cap(),
            ot_cutoff_hour: default_ot_cutoff_hour(),
        }
    }
}

impl HoursPolicy {
    pub fn validate(&self) -> AppResult<()> {
        let fields = [
            ("lunch_threshold_hours", self.lunch_threshold_hours),
            ("lunch_deduction_hours", self.lunch_deduction_hours),
            ("standard_cap_hours", self.standard_cap_hours),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::Config(format!(
                    "policy.{name} must be a non-negative number (got {value})"
                )));
            }
        }
        if self.ot_cutoff_hour > 23 {
            return Err(AppError::Config(format!(
                "policy.ot_cutoff_hour must be between 0 and 23 (got {})",
                self.ot_cutoff_hour
            )));
        }
        Ok(())
    }

    /// Worked hours after the lunch deduction, not clamped.
    pub fn net_hours(&self, total_hours: f64) -> f64 {
        if total_hours > self.lunch_threshold_hours {
            total_hours - self.lunch_deduction_hours
        } else {
            total_hours
        }
    }

    /// Net hours clamped at zero, rounded, and capped at the standard day.
    pub fn standard_hours(&self, total_hours: f64) -> f64 {
        let net = self.net_hours(total_hours).max(0.0);
        round2(net).min(self.standard_cap_hours)
    }

    /// Hours beyond the standard day, credited only when the checkout hour
    /// reaches the cutoff. A long day that ends before the cutoff earns no
    /// overtime.
    pub fn ot_hours(&self, total_hours: f64, checkout_hour: u32) -> f64 {
        if checkout_hour < self.ot_cutoff_hour {
            return 0.0;
        }

        let net = self.net_hours(total_hours);
        if net > self.standard_cap_hours {
            round2(net - self.standard_cap_hours).max(0.0)
        } else {
            0.0
        }
    }
}

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

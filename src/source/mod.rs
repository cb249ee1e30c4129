//! Punch collection from the time-clock database.

pub mod sqlite;

use crate::config::SourceConfig;
use crate::core::window::SyncWindow;
use crate::errors::{AppError, AppResult};
use crate::models::punch::RawPunch;
use chrono::{NaiveDate, NaiveDateTime};

/// Read side of the time-clock database.
pub trait PunchSource {
    /// Punches with `start <= timestamp <= end`, oldest first.
    fn fetch_punches(&self, start: NaiveDateTime, end: NaiveDateTime) -> AppResult<Vec<RawPunch>>;

    /// Newest punches of a single device user id.
    fn punches_for_device(&self, device_user_id: i64, limit: usize) -> AppResult<Vec<RawPunch>>;

    fn punches_on(&self, date: NaiveDate) -> AppResult<Vec<RawPunch>> {
        let window = SyncWindow::for_day(date);
        self.fetch_punches(window.start, window.end)
    }
}

/// Open the punch source named by `cfg.driver`.
pub fn open(cfg: &SourceConfig) -> AppResult<Box<dyn PunchSource>> {
    match cfg.driver.to_ascii_lowercase().as_str() {
        "sqlite" => Ok(Box::new(sqlite::SqlitePunchSource::open(cfg)?)),
        other => Err(AppError::Connection(format!(
            "unsupported source driver '{}' (supported: sqlite)",
            other
        ))),
    }
}

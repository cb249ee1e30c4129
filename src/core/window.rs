use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// Inclusive time window processed by one run. Naive local time throughout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SyncWindow {
    /// 00:00:00 through 23:59:59.999999 of `date`.
    pub fn for_day(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN);

        Self {
            start,
            end: start + TimeDelta::days(1) - TimeDelta::microseconds(1),
        }
    }

    /// 00:00:00 of `first` through the last instant of `last`.
    pub fn spanning(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: Self::for_day(first).start,
            end: Self::for_day(last).end,
        }
    }

    pub fn first_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn last_date(&self) -> NaiveDate {
        self.end.date()
    }

    /// Bounds in the textual layout stored by the destination tables.
    pub fn start_str(&self) -> String {
        self.start.format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }

    pub fn label(&self) -> String {
        if self.first_date() == self.last_date() {
            self.first_date().format("%Y-%m-%d").to_string()
        } else {
            format!(
                "{}..{}",
                self.first_date().format("%Y-%m-%d"),
                self.last_date().format("%Y-%m-%d")
            )
        }
    }
}

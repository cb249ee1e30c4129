use super::PunchSource;
use crate::config::SourceConfig;
use crate::errors::{AppError, AppResult};
use crate::models::punch::RawPunch;
use crate::utils::path::expand_tilde;
use crate::utils::time::parse_timestamp;
use chrono::NaiveDateTime;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params};
use tracing::{debug, error};

/// Time-clock export kept in a SQLite file with the device's
/// `CHECKINOUT(UserID, CheckTime)` layout. Opened read-only.
pub struct SqlitePunchSource {
    conn: Connection,
}

const BOUND_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.6f";

impl SqlitePunchSource {
    pub fn open(cfg: &SourceConfig) -> AppResult<Self> {
        let path = expand_tilde(&cfg.database);

        if !path.exists() {
            error!(path = %path.display(), "source database not found");
            return Err(AppError::Connection(format!(
                "source database not found: {}",
                path.display()
            )));
        }

        let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| AppError::Connection(format!("{}: {}", path.display(), e)))?;

        Self::from_connection(conn)
    }

    /// Wrap an already opened connection, checking the punch table exists.
    pub fn from_connection(conn: Connection) -> AppResult<Self> {
        let table: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type='table' AND name='CHECKINOUT'",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| AppError::Connection(e.to_string()))?;

        if table.is_none() {
            return Err(AppError::Connection(
                "source database has no CHECKINOUT table".to_string(),
            ));
        }

        Ok(Self { conn })
    }
}

fn map_punch(row: &Row) -> rusqlite::Result<(i64, String)> {
    Ok((row.get("UserID")?, row.get("CheckTime")?))
}

fn to_punches(rows: Vec<(i64, String)>) -> AppResult<Vec<RawPunch>> {
    rows.into_iter()
        .map(|(user_id, check_time)| Ok(RawPunch::new(user_id, parse_timestamp(&check_time)?)))
        .collect()
}

impl PunchSource for SqlitePunchSource {
    fn fetch_punches(&self, start: NaiveDateTime, end: NaiveDateTime) -> AppResult<Vec<RawPunch>> {
        // julianday() accepts both "YYYY-MM-DD HH:MM:SS" and the "T" variant.
        let mut stmt = self.conn.prepare_cached(
            "SELECT UserID, CheckTime FROM CHECKINOUT
             WHERE julianday(CheckTime) BETWEEN julianday(?1) AND julianday(?2)
             ORDER BY julianday(CheckTime) ASC",
        )?;

        let rows = stmt
            .query_map(
                params![
                    start.format(BOUND_LAYOUT).to_string(),
                    end.format(BOUND_LAYOUT).to_string()
                ],
                map_punch,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(count = rows.len(), %start, %end, "fetched punches");
        to_punches(rows)
    }

    fn punches_for_device(&self, device_user_id: i64, limit: usize) -> AppResult<Vec<RawPunch>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT UserID, CheckTime FROM CHECKINOUT
             WHERE UserID = ?1
             ORDER BY julianday(CheckTime) DESC
             LIMIT ?2",
        )?;

        let rows = stmt
            .query_map(params![device_user_id, limit as i64], map_punch)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        to_punches(rows)
    }
}

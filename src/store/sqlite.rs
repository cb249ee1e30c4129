use super::{AttendanceStore, WriteStats, write_chunked};
use crate::core::identity::EmployeeDirectory;
use crate::core::window::SyncWindow;
use crate::db::log::ttlog;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::employee::{EmployeeId, EmployeeRecord};
use crate::models::punch::RawLogRow;
use crate::models::summary::SummaryRow;
use crate::utils::path::expand_tilde;
use tracing::debug;

/// Local destination. The whole replace runs in one transaction, so a failed
/// write leaves the previous rows for the window in place.
pub struct SqliteStore {
    pool: DbPool,
    path: String,
}

impl SqliteStore {
    pub fn open(path: &str) -> AppResult<Self> {
        let resolved = expand_tilde(path);
        if let Some(dir) = resolved.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)?;
        }

        let resolved = resolved.to_string_lossy().to_string();
        let pool = DbPool::new(&resolved)
            .map_err(|e| AppError::Connection(format!("{}: {}", resolved, e)))?;

        Self::from_pool(pool, resolved)
    }

    /// Open an existing destination for reading only: no file is created
    /// and no migration runs.
    pub fn open_read_only(path: &str) -> AppResult<Self> {
        let resolved = expand_tilde(path);
        if !resolved.exists() {
            return Err(AppError::Connection(format!(
                "destination database not found: {}",
                resolved.display()
            )));
        }

        let resolved = resolved.to_string_lossy().to_string();
        let pool = DbPool::open_read_only(&resolved)
            .map_err(|e| AppError::Connection(format!("{}: {}", resolved, e)))?;

        Ok(Self {
            pool,
            path: resolved,
        })
    }

    /// Wrap an open pool and bring its schema up to date.
    pub fn from_pool(mut pool: DbPool, path: String) -> AppResult<Self> {
        run_pending_migrations(&mut pool.conn)
            .map_err(|e| AppError::Migration(e.to_string()))?;
        Ok(Self { pool, path })
    }

    pub fn pool(&mut self) -> &mut DbPool {
        &mut self.pool
    }

    pub fn upsert_employee(&self, emp: &EmployeeRecord) -> AppResult<()> {
        queries::upsert_employee(&self.pool.conn, emp)
    }

    pub fn raw_count_in_window(&self, window: &SyncWindow) -> AppResult<i64> {
        queries::count_raw_in_window(&self.pool.conn, window)
    }
}

impl EmployeeDirectory for SqliteStore {
    fn fetch_employees(&self) -> AppResult<Vec<EmployeeRecord>> {
        queries::load_employees(&self.pool.conn)
    }
}

impl AttendanceStore for SqliteStore {
    fn replace_window(
        &mut self,
        window: &SyncWindow,
        raw: &[RawLogRow],
        summaries: &[SummaryRow],
        batch_size: usize,
    ) -> AppResult<WriteStats> {
        let tx = self.pool.conn.transaction()?;

        let raw_deleted = queries::delete_raw_in_window(&tx, window)?;
        let summaries_deleted = queries::delete_summaries_in_window(&tx, window)?;

        let mut chunks = write_chunked(raw, batch_size, |chunk| {
            queries::insert_raw_rows(&tx, chunk).map(|_| ())
        })?;
        chunks += write_chunked(summaries, batch_size, |chunk| {
            queries::upsert_summaries(&tx, chunk).map(|_| ())
        })?;

        // Dropping `tx` on any `?` above rolls the whole replace back.
        tx.commit()?;

        debug!(raw_deleted, summaries_deleted, chunks, "sqlite window replaced");

        Ok(WriteStats {
            raw_deleted: Some(raw_deleted),
            summaries_deleted: Some(summaries_deleted),
            raw_inserted: raw.len(),
            summaries_upserted: summaries.len(),
            chunks,
        })
    }

    fn summaries_for_employee(&self, employee_id: &EmployeeId) -> AppResult<Vec<SummaryRow>> {
        queries::load_summaries_for_employee(&self.pool.conn, employee_id)
    }

    fn latest_summaries(&self, limit: usize) -> AppResult<Vec<SummaryRow>> {
        queries::load_latest_summaries(&self.pool.conn, limit)
    }

    fn summaries_in_window(&self, window: &SyncWindow) -> AppResult<Vec<SummaryRow>> {
        queries::load_summaries_in_window(&self.pool.conn, window)
    }

    fn record_run(&self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        ttlog(&self.pool.conn, operation, target, message)
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path)
    }
}

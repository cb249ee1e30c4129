//! Destination of the sync: raw punch log, daily summaries and the
//! employee directory.

pub mod sqlite;
pub mod supabase;

use crate::config::{DestinationConfig, DestinationKind};
use crate::core::identity::EmployeeDirectory;
use crate::core::window::SyncWindow;
use crate::errors::{AppError, AppResult};
use crate::models::employee::EmployeeId;
use crate::models::punch::RawLogRow;
use crate::models::summary::SummaryRow;

/// Counters reported back by `replace_window`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteStats {
    /// Rows removed by the scoped delete, when the store reports it.
    pub raw_deleted: Option<usize>,
    pub summaries_deleted: Option<usize>,
    pub raw_inserted: usize,
    pub summaries_upserted: usize,
    pub chunks: usize,
}

pub trait AttendanceStore: EmployeeDirectory {
    /// Replace everything stored for `window` with `raw` and `summaries`.
    /// Rows are sent in chunks of at most `batch_size`.
    fn replace_window(
        &mut self,
        window: &SyncWindow,
        raw: &[RawLogRow],
        summaries: &[SummaryRow],
        batch_size: usize,
    ) -> AppResult<WriteStats>;

    fn summaries_for_employee(&self, employee_id: &EmployeeId) -> AppResult<Vec<SummaryRow>>;

    fn latest_summaries(&self, limit: usize) -> AppResult<Vec<SummaryRow>>;

    /// Summaries dated inside `window`, by employee then date.
    fn summaries_in_window(&self, window: &SyncWindow) -> AppResult<Vec<SummaryRow>>;

    /// Append a line to the store's run log, if it keeps one.
    fn record_run(&self, _operation: &str, _target: &str, _message: &str) -> AppResult<()> {
        Ok(())
    }

    fn describe(&self) -> String;
}

/// Split `rows` into chunks of at most `batch_size` and feed them to `write`.
/// Returns the number of chunks written.
pub fn write_chunked<T, F>(rows: &[T], batch_size: usize, mut write: F) -> AppResult<usize>
where
    F: FnMut(&[T]) -> AppResult<()>,
{
    let mut chunks = 0;
    for chunk in rows.chunks(batch_size.max(1)) {
        write(chunk)?;
        chunks += 1;
    }
    Ok(chunks)
}

/// Open the destination named by the config.
pub fn open(cfg: &DestinationConfig) -> AppResult<Box<dyn AttendanceStore>> {
    match cfg.kind {
        DestinationKind::Sqlite => Ok(Box::new(sqlite::SqliteStore::open(&cfg.database)?)),
        DestinationKind::Supabase => open_supabase(cfg),
    }
}

/// Open the destination for the read-only commands. A SQLite destination
/// must already exist; it is neither created nor migrated.
pub fn open_read_only(cfg: &DestinationConfig) -> AppResult<Box<dyn AttendanceStore>> {
    match cfg.kind {
        DestinationKind::Sqlite => Ok(Box::new(sqlite::SqliteStore::open_read_only(
            &cfg.database,
        )?)),
        DestinationKind::Supabase => open_supabase(cfg),
    }
}

fn open_supabase(cfg: &DestinationConfig) -> AppResult<Box<dyn AttendanceStore>> {
    let (Some(url), Some(key)) = (cfg.url.as_deref(), cfg.key.as_deref()) else {
        return Err(AppError::MissingCredentials(
            "SUPABASE_URL and SUPABASE_KEY are required".to_string(),
        ));
    };
    Ok(Box::new(supabase::SupabaseStore::new(url, key)?))
}

//! The sync pipeline: collect → resolve → aggregate → replace.

use crate::core::calculator::aggregate::aggregate;
use crate::core::calculator::hours::HoursPolicy;
use crate::core::identity::IdentityResolver;
use crate::core::window::SyncWindow;
use crate::errors::AppResult;
use crate::models::summary::DailySummary;
use crate::source::PunchSource;
use crate::store::{AttendanceStore, WriteStats};
use chrono::NaiveDateTime;
use tracing::{info, warn};

/// Outcome of one run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub window: SyncWindow,
    pub fetched: usize,
    pub resolved: usize,
    pub dropped: usize,
    pub summaries: Vec<DailySummary>,
    /// `None` when nothing was written (no punches, or none resolvable).
    pub write: Option<WriteStats>,
}

impl SyncReport {
    fn empty(window: SyncWindow, fetched: usize, dropped: usize) -> Self {
        Self {
            window,
            fetched,
            resolved: 0,
            dropped,
            summaries: Vec::new(),
            write: None,
        }
    }
}

pub struct SyncLogic;

impl SyncLogic {
    /// Run the pipeline once for `window`.
    ///
    /// Nothing is written when the source has no punches for the window or
    /// none of them resolve to an employee; existing rows are then left as
    /// they are.
    pub fn run(
        source: &dyn PunchSource,
        store: &mut dyn AttendanceStore,
        window: &SyncWindow,
        policy: &HoursPolicy,
        batch_size: usize,
        recorded_at: NaiveDateTime,
    ) -> AppResult<SyncReport> {
        let punches = source.fetch_punches(window.start, window.end)?;
        info!(window = %window.label(), count = punches.len(), "punches collected");

        if punches.is_empty() {
            return Ok(SyncReport::empty(*window, 0, 0));
        }

        let mut resolver = IdentityResolver::from_directory(&*store)?;
        if resolver.known_employees() == 0 {
            warn!("employee directory is empty, every punch will be dropped");
        }

        let resolved = resolver.resolve_all(&punches);
        let dropped = resolver.misses();
        info!(resolved = resolved.len(), dropped, "punches resolved");

        if resolved.is_empty() {
            return Ok(SyncReport::empty(*window, punches.len(), dropped));
        }

        let summaries = aggregate(&resolved, policy);

        let raw_rows: Vec<_> = resolved.iter().map(|p| p.to_log_row(recorded_at)).collect();
        let summary_rows: Vec<_> = summaries.iter().map(|s| s.to_row()).collect();

        let stats = store.replace_window(window, &raw_rows, &summary_rows, batch_size)?;

        // the rows are already committed; a lost log line must not fail the run
        if let Err(e) = store.record_run(
            "sync",
            &window.label(),
            &format!(
                "{} punches, {} dropped, {} summaries",
                punches.len(),
                dropped,
                summary_rows.len()
            ),
        ) {
            warn!(error = %e, "failed to record the sync run");
        }

        Ok(SyncReport {
            window: *window,
            fetched: punches.len(),
            resolved: resolved.len(),
            dropped,
            summaries,
            write: Some(stats),
        })
    }
}

use attendsync::core::calculator::hours::HoursPolicy;
use attendsync::core::identity::EmployeeDirectory;
use attendsync::core::sync::SyncLogic;
use attendsync::core::window::SyncWindow;
use attendsync::errors::{AppError, AppResult};
use attendsync::models::employee::{EmployeeId, EmployeeRecord};
use attendsync::models::punch::{RawLogRow, RawPunch};
use attendsync::models::summary::SummaryRow;
use attendsync::source::PunchSource;
use attendsync::store::sqlite::SqliteStore;
use attendsync::store::{AttendanceStore, WriteStats};
use chrono::{NaiveDate, NaiveDateTime};

mod common;
use common::{day, directory, memory_source, memory_store, ts};

const DAY_PUNCHES: &[(i64, &str)] = &[
    (7, "2025-09-01 08:00:00"),
    (7, "2025-09-01 17:30:00"),
    (9, "2025-09-01 08:00:00"),
    (9, "2025-09-01 19:00:00"),
    (99, "2025-09-01 09:00:00"),
    (3, "2025-09-01 10:00:00"),
    (7, "2025-09-02 08:00:00"),
];

struct DownSource;

impl PunchSource for DownSource {
    fn fetch_punches(&self, _: NaiveDateTime, _: NaiveDateTime) -> AppResult<Vec<RawPunch>> {
        Err(AppError::Connection("time clock offline".to_string()))
    }

    fn punches_for_device(&self, _: i64, _: usize) -> AppResult<Vec<RawPunch>> {
        Err(AppError::Connection("time clock offline".to_string()))
    }
}

/// SQLite destination whose run log cannot be written.
struct NoRunLog(SqliteStore);

impl EmployeeDirectory for NoRunLog {
    fn fetch_employees(&self) -> AppResult<Vec<EmployeeRecord>> {
        self.0.fetch_employees()
    }
}

impl AttendanceStore for NoRunLog {
    fn replace_window(
        &mut self,
        window: &SyncWindow,
        raw: &[RawLogRow],
        summaries: &[SummaryRow],
        batch_size: usize,
    ) -> AppResult<WriteStats> {
        self.0.replace_window(window, raw, summaries, batch_size)
    }

    fn summaries_for_employee(&self, employee_id: &EmployeeId) -> AppResult<Vec<SummaryRow>> {
        self.0.summaries_for_employee(employee_id)
    }

    fn latest_summaries(&self, limit: usize) -> AppResult<Vec<SummaryRow>> {
        self.0.latest_summaries(limit)
    }

    fn summaries_in_window(&self, window: &SyncWindow) -> AppResult<Vec<SummaryRow>> {
        self.0.summaries_in_window(window)
    }

    fn record_run(&self, _: &str, _: &str, _: &str) -> AppResult<()> {
        Err(AppError::Io(std::io::Error::other("log table is locked")))
    }

    fn describe(&self) -> String {
        "no-run-log".to_string()
    }
}

fn window(d: &str) -> SyncWindow {
    SyncWindow::for_day(day(d))
}

fn recorded_at() -> NaiveDateTime {
    ts("2025-09-01 20:00:00")
}

#[test]
fn pipeline_resolves_aggregates_and_writes_one_day() {
    let src = memory_source(DAY_PUNCHES);
    let mut store = memory_store(&directory());
    let w = window("2025-09-01");

    let report = SyncLogic::run(&src, &mut store, &w, &HoursPolicy::default(), 1000, recorded_at())
        .unwrap();

    assert_eq!(report.fetched, 6);
    assert_eq!(report.resolved, 4);
    assert_eq!(report.dropped, 2);

    let stats = report.write.expect("rows written");
    assert_eq!(stats.raw_inserted, 4);
    assert_eq!(stats.summaries_upserted, 2);

    let rows = store.summaries_in_window(&w).unwrap();
    assert_eq!(rows.len(), 2);

    let emp1 = &rows[0];
    assert_eq!(emp1.employee_id.as_str(), "emp-1");
    assert_eq!(emp1.check_in.as_deref(), Some("08:00:00"));
    assert_eq!(emp1.check_out.as_deref(), Some("19:00:00"));
    assert_eq!(emp1.standard_hours, 8.0);
    assert_eq!(emp1.ot_hours, 2.0);

    let emp5 = &rows[1];
    assert_eq!(emp5.employee_id.as_str(), "emp-5");
    assert_eq!(emp5.standard_hours, 8.0);
    assert_eq!(emp5.ot_hours, 0.0);

    assert_eq!(store.raw_count_in_window(&w).unwrap(), 4);
    // the next-day punch is outside the window
    assert_eq!(store.raw_count_in_window(&window("2025-09-02")).unwrap(), 0);
}

#[test]
fn running_twice_gives_the_same_rows() {
    let src = memory_source(DAY_PUNCHES);
    let mut store = memory_store(&directory());
    let w = window("2025-09-01");
    let policy = HoursPolicy::default();

    SyncLogic::run(&src, &mut store, &w, &policy, 3, recorded_at()).unwrap();
    let first = store.summaries_in_window(&w).unwrap();

    let again = SyncLogic::run(&src, &mut store, &w, &policy, 3, recorded_at()).unwrap();
    assert_eq!(again.write.unwrap().raw_deleted, Some(4));

    assert_eq!(store.summaries_in_window(&w).unwrap(), first);
    assert_eq!(store.raw_count_in_window(&w).unwrap(), 4);
}

#[test]
fn later_run_drops_rows_of_employees_without_punches() {
    let mut store = memory_store(&directory());
    let w = window("2025-09-01");
    let policy = HoursPolicy::default();

    let before = memory_source(DAY_PUNCHES);
    SyncLogic::run(&before, &mut store, &w, &policy, 1000, recorded_at()).unwrap();

    // device 9 (emp-1) punches were corrected away at the source
    let after = memory_source(&[(7, "2025-09-01 08:00:00"), (7, "2025-09-01 12:00:00")]);
    SyncLogic::run(&after, &mut store, &w, &policy, 1000, recorded_at()).unwrap();

    let rows = store.summaries_in_window(&w).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].employee_id.as_str(), "emp-5");
    assert_eq!(rows[0].standard_hours, 4.0);
    assert_eq!(store.raw_count_in_window(&w).unwrap(), 2);
}

#[test]
fn syncing_one_day_leaves_other_days_alone() {
    let src = memory_source(DAY_PUNCHES);
    let mut store = memory_store(&directory());
    let policy = HoursPolicy::default();

    SyncLogic::run(&src, &mut store, &window("2025-09-02"), &policy, 1000, recorded_at())
        .unwrap();
    SyncLogic::run(&src, &mut store, &window("2025-09-01"), &policy, 1000, recorded_at())
        .unwrap();

    let next = store.summaries_in_window(&window("2025-09-02")).unwrap();
    assert_eq!(next.len(), 1);
    assert_eq!(next[0].check_out, None);
    assert_eq!(store.summaries_in_window(&window("2025-09-01")).unwrap().len(), 2);
}

#[test]
fn empty_window_writes_nothing() {
    let mut store = memory_store(&directory());
    let policy = HoursPolicy::default();

    SyncLogic::run(
        &memory_source(DAY_PUNCHES),
        &mut store,
        &window("2025-09-01"),
        &policy,
        1000,
        recorded_at(),
    )
    .unwrap();

    // a day without punches keeps whatever is stored for it
    let w = window("2025-09-01");
    let report = SyncLogic::run(
        &memory_source(&[]),
        &mut store,
        &w,
        &policy,
        1000,
        recorded_at(),
    )
    .unwrap();

    assert_eq!(report.fetched, 0);
    assert!(report.write.is_none());
    assert!(report.summaries.is_empty());
    assert_eq!(store.summaries_in_window(&w).unwrap().len(), 2);
}

#[test]
fn unresolvable_punches_write_nothing() {
    let src = memory_source(&[(99, "2025-09-01 08:00:00"), (3, "2025-09-01 17:00:00")]);
    let mut store = memory_store(&directory());
    let w = window("2025-09-01");

    let report =
        SyncLogic::run(&src, &mut store, &w, &HoursPolicy::default(), 1000, recorded_at())
            .unwrap();

    assert_eq!(report.fetched, 2);
    assert_eq!(report.dropped, 2);
    assert!(report.write.is_none());
    assert_eq!(store.raw_count_in_window(&w).unwrap(), 0);
}

#[test]
fn unreachable_source_aborts_before_writing() {
    let mut store = memory_store(&directory());
    let w = window("2025-09-01");

    SyncLogic::run(
        &memory_source(DAY_PUNCHES),
        &mut store,
        &w,
        &HoursPolicy::default(),
        1000,
        recorded_at(),
    )
    .unwrap();
    let before = store.summaries_in_window(&w).unwrap();

    let err = SyncLogic::run(
        &DownSource,
        &mut store,
        &w,
        &HoursPolicy::default(),
        1000,
        recorded_at(),
    )
    .unwrap_err();

    assert!(err.is_connection());
    assert_eq!(store.summaries_in_window(&w).unwrap(), before);
}

#[test]
fn raw_rows_carry_the_recording_time() {
    let src = memory_source(&[(7, "2025-09-01 08:00:00")]);
    let mut store = memory_store(&directory());
    let w = window("2025-09-01");

    SyncLogic::run(&src, &mut store, &w, &HoursPolicy::default(), 1000, recorded_at()).unwrap();

    let created: String = store
        .pool()
        .conn
        .query_row("SELECT created_at FROM attendance_raw", [], |r| r.get(0))
        .unwrap();
    assert_eq!(created, "2025-09-01T20:00:00");

    let logged: i64 = store
        .pool()
        .conn
        .query_row(
            "SELECT COUNT(*) FROM log WHERE operation = 'sync' AND target = '2025-09-01'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(logged, 1);
    assert_eq!(store.describe(), "sqlite::memory:");
}

#[test]
fn window_dates_stay_naive() {
    let w = window("2025-12-31");
    assert_eq!(w.first_date(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    assert_eq!(w.last_date(), w.first_date());
}

#[test]
fn failing_run_log_does_not_fail_a_committed_sync() {
    let src = memory_source(DAY_PUNCHES);
    let mut store = NoRunLog(memory_store(&directory()));
    let w = window("2025-09-01");

    let report = SyncLogic::run(&src, &mut store, &w, &HoursPolicy::default(), 1000, recorded_at())
        .expect("a lost log line is not fatal");

    let stats = report.write.expect("rows written");
    assert_eq!(stats.summaries_upserted, 2);
    assert_eq!(store.summaries_in_window(&w).unwrap().len(), 2);
}

use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. Migrations are recorded in it.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Ordered schema steps: (version, description, sql).
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20250901_0001_create_employees",
        "Created employees table",
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id             TEXT PRIMARY KEY,
            employee_code  TEXT NOT NULL UNIQUE,
            full_name      TEXT
        );
        "#,
    ),
    (
        "20250901_0002_create_attendance_raw",
        "Created attendance_raw table",
        r#"
        CREATE TABLE IF NOT EXISTS attendance_raw (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id  TEXT NOT NULL,
            check_time   TEXT NOT NULL,
            created_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_raw_check_time ON attendance_raw(check_time);
        "#,
    ),
    (
        "20250901_0003_create_attendance",
        "Created attendance summary table",
        r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id     TEXT NOT NULL,
            date            TEXT NOT NULL,
            check_in        TEXT,
            check_out       TEXT,
            standard_hours  REAL NOT NULL DEFAULT 0 CHECK(standard_hours >= 0),
            ot_hours        REAL NOT NULL DEFAULT 0 CHECK(ot_hours >= 0),
            UNIQUE(employee_id, date)
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date);
        "#,
    ),
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Public entry point: run all pending migrations.
/// Each step and its `log` marker are committed together.
pub fn run_pending_migrations(conn: &mut Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for (version, description, sql) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            [version, description],
        )?;
        tx.commit()?;

        success(format!("Migration applied: {} → {}", version, description));
        applied += 1;
    }

    Ok(applied)
}

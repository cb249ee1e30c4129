#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use attendsync::config::{Config, DestinationKind};
use attendsync::models::employee::{EmployeeId, EmployeeRecord};
use attendsync::source::sqlite::SqlitePunchSource;
use attendsync::store::sqlite::SqliteStore;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables that would override the test config.
const ENV_OVERRIDES: &[&str] = &[
    "SQL_DRIVER",
    "SQL_SERVER",
    "SQL_DATABASE",
    "SQL_USERNAME",
    "SQL_PASSWORD",
    "SQL_TRUSTED_CONNECTION",
    "ATTENDSYNC_DESTINATION",
    "ATTENDSYNC_DEST_DB",
    "ATTENDSYNC_BATCH_SIZE",
    "SUPABASE_URL",
    "SUPABASE_KEY",
    "VITE_SUPABASE_URL",
    "VITE_SUPABASE_ANON_KEY",
    "RUST_LOG",
];

pub fn ats() -> Command {
    let mut cmd = cargo_bin_cmd!("attendsync");
    for var in ENV_OVERRIDES {
        cmd.env_remove(var);
    }
    cmd
}

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("valid timestamp")
}

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

pub fn employee(id: &str, code: &str, name: Option<&str>) -> EmployeeRecord {
    EmployeeRecord {
        id: EmployeeId::new(id),
        employee_code: code.to_string(),
        full_name: name.map(str::to_string),
    }
}

/// Create the device's CHECKINOUT table and fill it.
pub fn seed_punches(conn: &Connection, punches: &[(i64, &str)]) {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS CHECKINOUT (UserID INTEGER NOT NULL, CheckTime TEXT NOT NULL);",
    )
    .expect("create CHECKINOUT");

    for (user, time) in punches {
        conn.execute(
            "INSERT INTO CHECKINOUT (UserID, CheckTime) VALUES (?1, ?2)",
            rusqlite::params![user, time],
        )
        .expect("insert punch");
    }
}

pub fn memory_source(punches: &[(i64, &str)]) -> SqlitePunchSource {
    let conn = Connection::open_in_memory().expect("open memory source");
    seed_punches(&conn, punches);
    SqlitePunchSource::from_connection(conn).expect("source")
}

pub fn memory_store(employees: &[EmployeeRecord]) -> SqliteStore {
    let pool = attendsync::db::pool::DbPool::in_memory().expect("memory db");
    let store = SqliteStore::from_pool(pool, ":memory:".to_string()).expect("store");
    for e in employees {
        store.upsert_employee(e).expect("seed employee");
    }
    store
}

/// Temp directory holding a source file, a destination file and a config
/// file pointing at both.
pub struct TestEnv {
    pub dir: TempDir,
    pub source_db: PathBuf,
    pub dest_db: PathBuf,
    pub config: PathBuf,
}

impl TestEnv {
    pub fn new(punches: &[(i64, &str)], employees: &[EmployeeRecord]) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let source_db = dir.path().join("timeclock.sqlite");
        let dest_db = dir.path().join("attendance.sqlite");
        let config = dir.path().join("attendsync.conf");

        let conn = Connection::open(&source_db).expect("open source file");
        seed_punches(&conn, punches);

        let store = SqliteStore::open(&dest_db.to_string_lossy()).expect("open dest");
        for e in employees {
            store.upsert_employee(e).expect("seed employee");
        }

        let mut cfg = Config::default();
        cfg.source.database = source_db.to_string_lossy().to_string();
        cfg.destination.kind = DestinationKind::Sqlite;
        cfg.destination.database = dest_db.to_string_lossy().to_string();
        cfg.batch_size = 2;
        cfg.save(&config).expect("write config");

        Self {
            dir,
            source_db,
            dest_db,
            config,
        }
    }

    /// The binary, pointed at this environment's config file.
    pub fn cmd(&self) -> Command {
        let mut cmd = ats();
        cmd.arg("--config").arg(&self.config);
        cmd
    }

    pub fn store(&self) -> SqliteStore {
        SqliteStore::open(&self.dest_db.to_string_lossy()).expect("reopen dest")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Two roster employees: device 7 → NV005, device 9 → NV001.
pub fn directory() -> Vec<EmployeeRecord> {
    vec![
        employee("emp-5", "NV005", Some("Nguyen Van Nam")),
        employee("emp-1", "NV001", None),
    ]
}

use crate::config::{Config, DestinationKind};
use crate::errors::AppResult;
use crate::store::AttendanceStore;
use crate::store::sqlite::SqliteStore;
use crate::ui::messages::{info, success, warning};
use std::path::Path;

/// Handle the `init` command
///
/// This initializes:
///  - the configuration file (kept if it already exists)
///  - the SQLite destination schema, when that destination is selected
pub fn handle(cfg: &Config, path: &Path) -> AppResult<()> {
    println!("⚙️  Initializing attendsync…");

    if path.exists() {
        info(format!("Config file already present: {}", path.display()));
    } else {
        cfg.save(path)?;
        success(format!("Config file: {}", path.display()));
    }

    match cfg.destination.kind {
        DestinationKind::Sqlite => {
            let store = SqliteStore::open(&cfg.destination.database)?;

            // non-blocking: a failed log line must not fail init
            if let Err(e) = store.record_run("init", "destination", "Destination schema ready") {
                warning(format!("Failed to write internal log: {}", e));
            }
            success(format!("Destination ready: {}", store.describe()));
        }
        DestinationKind::Supabase => {
            info("Supabase destination: tables are managed on the Supabase project.");
        }
    }

    println!("🎉 attendsync initialization completed!");
    Ok(())
}

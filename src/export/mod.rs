// src/export/mod.rs

mod timesheet;

pub use timesheet::write_timesheet_csv;

use crate::ui::messages::success;
use std::path::Path;

/// Common completion message for exports.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

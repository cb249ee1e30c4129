// src/export/timesheet.rs

use crate::core::report::{EmployeeMonth, ReportMonth};
use crate::errors::{AppError, AppResult};
use crate::utils::time::format_hours;
use chrono::Datelike;
use csv::Writer;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Written before the header so spreadsheets read the file as UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const FIXED_COLUMNS: [&str; 9] = [
    "No",
    "Name",
    "Code",
    "Days",
    "Standard",
    "OT",
    "Weekend",
    "Converted OT",
    "Total",
];

fn csv_error(e: csv::Error) -> AppError {
    AppError::from(io::Error::other(format!("CSV write error: {e}")))
}

/// Write the timesheet of `month`: totals first, then one column per day.
pub fn write_timesheet_csv(
    path: &Path,
    month: &ReportMonth,
    lines: &[EmployeeMonth],
) -> AppResult<()> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut wtr = Writer::from_writer(file);

    let mut header: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
    header.extend(month.days().map(|d| d.day().to_string()));
    wtr.write_record(&header).map_err(csv_error)?;

    for (i, line) in lines.iter().enumerate() {
        let t = &line.totals;
        let mut record = vec![
            (i + 1).to_string(),
            line.name.clone(),
            line.code.clone(),
            t.days_worked.to_string(),
            format_hours(t.standard_hours),
            format_hours(t.weekday_ot_hours),
            format_hours(t.weekend_hours),
            format_hours(t.converted_ot_hours),
            format_hours(t.total_work()),
        ];
        record.extend(month.days().map(|d| line.day_cell(d.day())));
        wtr.write_record(&record).map_err(csv_error)?;
    }

    wtr.flush()?;
    Ok(())
}

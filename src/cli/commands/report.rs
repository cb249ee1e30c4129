use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report::{ReportLogic, ReportMonth};
use crate::export::{notify_export_success, write_timesheet_csv};
use crate::errors::AppResult;
use crate::store;
use crate::ui::messages::{header, info, warning};
use crate::utils::table::Table;
use crate::utils::time::format_hours;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Report { month, csv } = cmd else {
        return Ok(());
    };

    let month = match month {
        Some(m) => ReportMonth::parse(m)?,
        None => ReportMonth::current(),
    };

    let dest = store::open_read_only(&cfg.destination)?;
    let lines = ReportLogic::monthly(dest.as_ref(), &month, &cfg.timesheet)?;

    header(format!("Timesheet {}", month.label()));
    if lines.is_empty() {
        warning(format!("No attendance records for {}.", month.label()));
        return Ok(());
    }

    let mut table = Table::new([
        "CODE", "NAME", "DAYS", "STD", "OT", "WEEKEND", "CONV OT", "TOTAL",
    ]);
    for line in &lines {
        let t = &line.totals;
        table.add_row(vec![
            line.code.clone(),
            line.name.clone(),
            t.days_worked.to_string(),
            format_hours(t.standard_hours),
            format_hours(t.weekday_ot_hours),
            format_hours(t.weekend_hours),
            format_hours(t.converted_ot_hours),
            format_hours(t.total_work()),
        ]);
    }
    print!("{}", table.render());

    if let Some(path) = csv {
        info(format!("Exporting to CSV: {}", path.display()));
        write_timesheet_csv(path, &month, &lines)?;
        notify_export_success("CSV", path);
    }

    Ok(())
}

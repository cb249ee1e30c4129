use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::sync::{SyncLogic, SyncReport};
use crate::core::window::SyncWindow;
use crate::errors::AppResult;
use crate::source;
use crate::store;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::or_missing;
use crate::utils::date::date_or_today;
use crate::utils::table::Table;
use crate::utils::time::format_hours;
use chrono::Local;

/// Run the pipeline for one day.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sync { date } = cmd {
        let day = date_or_today(date.as_deref())?;
        let window = SyncWindow::for_day(day);

        info(format!("Connecting to source {}…", cfg.source.describe()));
        let src = source::open(&cfg.source)?;

        let mut dest = store::open(&cfg.destination)?;
        info(format!("Syncing {} into {}…", window.label(), dest.describe()));

        let report = SyncLogic::run(
            src.as_ref(),
            dest.as_mut(),
            &window,
            &cfg.policy,
            cfg.batch_size,
            Local::now().naive_local(),
        )?;

        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &SyncReport) {
    println!("Found {} punches for {}.", report.fetched, report.window.label());

    if report.dropped > 0 {
        warning(format!(
            "{} punches dropped (device id or employee code not mapped).",
            report.dropped
        ));
    }

    let Some(stats) = &report.write else {
        info("No data to sync.");
        return;
    };

    let mut table = Table::new(["EMPLOYEE", "DATE", "IN", "OUT", "STD", "OT"]);
    for s in &report.summaries {
        table.add_row(vec![
            s.employee_id.to_string(),
            s.date_str(),
            or_missing(s.check_in_str().as_deref()),
            or_missing(s.check_out_str().as_deref()),
            format_hours(s.standard_hours),
            format_hours(s.ot_hours),
        ]);
    }
    print!("{}", table.render());

    success(format!(
        "Inserted {} raw logs and {} attendance summaries ({} chunks).",
        stats.raw_inserted, stats.summaries_upserted, stats.chunks
    ));
}

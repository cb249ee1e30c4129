use crate::cli::parser::{CheckTarget, Commands};
use crate::config::Config;
use crate::core::check::CheckLogic;
use crate::core::identity::device_code;
use crate::errors::{AppError, AppResult};
use crate::models::summary::SummaryRow;
use crate::source;
use crate::store;
use crate::ui::messages::{header, warning};
use crate::utils::colors::{CYAN, RESET, or_missing};
use crate::utils::date::parse_date;
use crate::utils::table::Table;
use crate::utils::time::{format_hours, hours2readable};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Check { target } = cmd else {
        return Ok(());
    };

    match target {
        CheckTarget::Date { date } => {
            let day = parse_date(date).ok_or_else(|| AppError::InvalidDate(date.clone()))?;
            let src = source::open(&cfg.source)?;
            let found = CheckLogic::punches_on(src.as_ref(), day)?;

            header(format!("Punches on {}", day));
            println!("Found {} records on {}.", found.punches.len(), day);
            for p in &found.punches {
                println!(
                    "UserID: {:>3}  Time: {}  Code: {}",
                    p.device_user_id,
                    p.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    device_code(p.device_user_id).unwrap_or("-")
                );
            }
            println!("{}", "-".repeat(20));
            println!("Unique UserIDs present: {:?}", found.device_ids());

            let unmapped = found.unmapped_ids();
            if !unmapped.is_empty() {
                warning(format!("UserIDs not on the device roster: {:?}", unmapped));
            }
        }

        CheckTarget::Device { id, limit } => {
            let src = source::open(&cfg.source)?;
            let punches = CheckLogic::device_history(src.as_ref(), *id, *limit)?;

            header(format!("Punches of UserID {}", id));
            match device_code(*id) {
                Some(code) => println!("Roster code: {CYAN}{code}{RESET}"),
                None => warning(format!("UserID {} is not on the device roster.", id)),
            }
            println!("Found {} records for UserID {}.", punches.len(), id);
            for (i, p) in punches.iter().enumerate() {
                println!(
                    "{}. UserID: {}, CheckTime: {}",
                    i + 1,
                    p.device_user_id,
                    p.timestamp.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }

        CheckTarget::Employee { code } => {
            let dest = store::open_read_only(&cfg.destination)?;
            let Some(found) = CheckLogic::employee_attendance(dest.as_ref(), code)? else {
                warning(format!("Employee {} not found!", code));
                return Ok(());
            };

            header(format!(
                "Attendance of {} ({})",
                found.employee.display_name(),
                found.employee.employee_code
            ));
            if let Some(device) = found.device_user_id {
                println!("Device UserID: {}", device);
            }

            if found.rows.is_empty() {
                println!("No attendance records found.");
            } else {
                let total: f64 = found.rows.iter().map(|r| r.standard_hours + r.ot_hours).sum();
                print!("{}", summary_table(&found.rows, false).render());
                println!("Total credited: {}", hours2readable(total));
            }
        }

        CheckTarget::Latest { limit } => {
            let dest = store::open_read_only(&cfg.destination)?;
            let rows = CheckLogic::latest(dest.as_ref(), *limit)?;

            header("Latest attendance");
            if rows.is_empty() {
                println!("No attendance records found.");
            } else {
                print!("{}", summary_table(&rows, true).render());
            }
        }
    }

    Ok(())
}

fn summary_table(rows: &[SummaryRow], with_employee: bool) -> Table {
    let mut headers = vec!["DATE", "IN", "OUT", "STD", "OT"];
    if with_employee {
        headers.insert(1, "EMPLOYEE");
    }

    let mut table = Table::new(headers);
    for r in rows {
        let mut cells = vec![
            r.date.clone(),
            or_missing(r.check_in.as_deref()),
            or_missing(r.check_out.as_deref()),
            format_hours(r.standard_hours),
            format_hours(r.ot_hours),
        ];
        if with_employee {
            cells.insert(1, r.employee_id.to_string());
        }
        table.add_row(cells);
    }
    table
}

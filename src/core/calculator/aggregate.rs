use crate::core::calculator::hours::HoursPolicy;
use crate::models::employee::EmployeeId;
use crate::models::punch::ResolvedPunch;
use crate::models::summary::DailySummary;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::collections::BTreeMap;

/// Group punches by (employee, calendar date) and build one summary per group.
///
/// The output is sorted by employee id, then date, whatever the input order.
pub fn aggregate(punches: &[ResolvedPunch], policy: &HoursPolicy) -> Vec<DailySummary> {
    let mut groups: BTreeMap<(EmployeeId, NaiveDate), Vec<NaiveDateTime>> = BTreeMap::new();

    for p in punches {
        groups
            .entry((p.employee_id.clone(), p.date()))
            .or_default()
            .push(p.timestamp);
    }

    groups
        .into_iter()
        .map(|((employee_id, date), mut times)| {
            summarize_day(employee_id, date, &mut times, policy)
        })
        .collect()
}

/// Build the summary for one employee's punches on one day.
///
/// `times` must be non-empty; it is sorted in place.
pub fn summarize_day(
    employee_id: EmployeeId,
    date: NaiveDate,
    times: &mut [NaiveDateTime],
    policy: &HoursPolicy,
) -> DailySummary {
    times.sort();

    let mut summary = DailySummary {
        employee_id,
        date,
        check_in: times.first().map(|t| t.time()),
        check_out: None,
        standard_hours: 0.0,
        ot_hours: 0.0,
    };

    let (Some(first), Some(last)) = (times.first(), times.last()) else {
        return summary;
    };

    // A single punch, or duplicates of the same instant, credit nothing.
    if times.len() < 2 || last <= first {
        return summary;
    }

    let total_hours = (*last - *first).num_seconds() as f64 / 3600.0;

    summary.check_out = Some(last.time());
    summary.standard_hours = policy.standard_hours(total_hours);
    summary.ot_hours = policy.ot_hours(total_hours, last.hour());

    summary
}

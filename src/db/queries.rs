use crate::core::window::SyncWindow;
use crate::errors::AppResult;
use crate::models::employee::{EmployeeId, EmployeeRecord};
use crate::models::punch::RawLogRow;
use crate::models::summary::SummaryRow;
use rusqlite::{Connection, Result, Row, params};

pub fn map_summary(row: &Row) -> Result<SummaryRow> {
    Ok(SummaryRow {
        employee_id: EmployeeId::new(row.get::<_, String>("employee_id")?),
        date: row.get("date")?,
        check_in: row.get("check_in")?,
        check_out: row.get("check_out")?,
        standard_hours: row.get("standard_hours")?,
        ot_hours: row.get("ot_hours")?,
    })
}

fn map_employee(row: &Row) -> Result<EmployeeRecord> {
    Ok(EmployeeRecord {
        id: EmployeeId::new(row.get::<_, String>("id")?),
        employee_code: row.get("employee_code")?,
        full_name: row.get("full_name")?,
    })
}

pub fn load_employees(conn: &Connection) -> AppResult<Vec<EmployeeRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, employee_code, full_name FROM employees ORDER BY employee_code ASC",
    )?;

    let rows = stmt.query_map([], map_employee)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Insert or refresh an employee by code.
pub fn upsert_employee(conn: &Connection, emp: &EmployeeRecord) -> AppResult<()> {
    conn.execute(
        "INSERT INTO employees (id, employee_code, full_name)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(employee_code) DO UPDATE SET
             id = excluded.id,
             full_name = excluded.full_name",
        params![emp.id.as_str(), emp.employee_code, emp.full_name],
    )?;
    Ok(())
}

/// Delete raw punches whose check time falls inside the window.
pub fn delete_raw_in_window(conn: &Connection, window: &SyncWindow) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM attendance_raw
         WHERE julianday(check_time) BETWEEN julianday(?1) AND julianday(?2)",
        params![window.start_str(), window.end_str()],
    )?;
    Ok(n)
}

/// Delete summaries whose date falls inside the window.
pub fn delete_summaries_in_window(conn: &Connection, window: &SyncWindow) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM attendance WHERE date BETWEEN ?1 AND ?2",
        params![
            window.first_date().format("%Y-%m-%d").to_string(),
            window.last_date().format("%Y-%m-%d").to_string()
        ],
    )?;
    Ok(n)
}

pub fn insert_raw_rows(conn: &Connection, rows: &[RawLogRow]) -> AppResult<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO attendance_raw (employee_id, check_time, created_at)
         VALUES (?1, ?2, ?3)",
    )?;

    for r in rows {
        stmt.execute(params![r.employee_id.as_str(), r.check_time, r.created_at])?;
    }
    Ok(rows.len())
}

/// Insert summaries, replacing any existing row with the same (employee_id, date).
pub fn upsert_summaries(conn: &Connection, rows: &[SummaryRow]) -> AppResult<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO attendance (employee_id, date, check_in, check_out, standard_hours, ot_hours)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(employee_id, date) DO UPDATE SET
             check_in = excluded.check_in,
             check_out = excluded.check_out,
             standard_hours = excluded.standard_hours,
             ot_hours = excluded.ot_hours",
    )?;

    for r in rows {
        stmt.execute(params![
            r.employee_id.as_str(),
            r.date,
            r.check_in,
            r.check_out,
            r.standard_hours,
            r.ot_hours,
        ])?;
    }
    Ok(rows.len())
}

pub fn load_summaries_for_employee(
    conn: &Connection,
    employee_id: &EmployeeId,
) -> AppResult<Vec<SummaryRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM attendance
         WHERE employee_id = ?1
         ORDER BY date DESC",
    )?;

    let rows = stmt.query_map([employee_id.as_str()], map_summary)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_latest_summaries(conn: &Connection, limit: usize) -> AppResult<Vec<SummaryRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM attendance
         ORDER BY date DESC, employee_id ASC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map([limit as i64], map_summary)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_summaries_in_window(
    conn: &Connection,
    window: &SyncWindow,
) -> AppResult<Vec<SummaryRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM attendance
         WHERE date BETWEEN ?1 AND ?2
         ORDER BY employee_id ASC, date ASC",
    )?;

    let rows = stmt.query_map(
        params![
            window.first_date().format("%Y-%m-%d").to_string(),
            window.last_date().format("%Y-%m-%d").to_string()
        ],
        map_summary,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_raw_in_window(conn: &Connection, window: &SyncWindow) -> AppResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM attendance_raw
         WHERE julianday(check_time) BETWEEN julianday(?1) AND julianday(?2)",
        params![window.start_str(), window.end_str()],
        |row| row.get(0),
    )?;
    Ok(n)
}

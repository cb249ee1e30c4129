use super::{AttendanceStore, WriteStats, write_chunked};
use crate::core::identity::EmployeeDirectory;
use crate::core::window::SyncWindow;
use crate::errors::{AppError, AppResult};
use crate::models::employee::{EmployeeId, EmployeeRecord};
use crate::models::punch::RawLogRow;
use crate::models::summary::SummaryRow;
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

const RAW_TABLE: &str = "attendance_raw";
const SUMMARY_TABLE: &str = "attendance";
const EMPLOYEE_TABLE: &str = "employees";

/// Supabase destination, spoken to through its PostgREST endpoint.
///
/// PostgREST has no transaction spanning several requests: if a chunk is
/// rejected after the scoped delete, the window stays partially written
/// until the next successful run.
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    key: String,
}

/// PostgREST filters selecting the raw punches inside the window.
pub fn raw_window_filter(window: &SyncWindow) -> Vec<(&'static str, String)> {
    vec![
        ("check_time", format!("gte.{}", window.start_str())),
        ("check_time", format!("lte.{}", window.end_str())),
    ]
}

/// PostgREST filters selecting the summaries dated inside the window.
pub fn summary_window_filter(window: &SyncWindow) -> Vec<(&'static str, String)> {
    let first = window.first_date().format("%Y-%m-%d").to_string();
    let last = window.last_date().format("%Y-%m-%d").to_string();

    if first == last {
        vec![("date", format!("eq.{}", first))]
    } else {
        vec![
            ("date", format!("gte.{}", first)),
            ("date", format!("lte.{}", last)),
        ]
    }
}

impl SupabaseStore {
    pub fn new(base_url: &str, key: &str) -> AppResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
        })
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", self.key))
    }

    /// Send a read. Transport failures and error statuses are connection errors.
    fn read(&self, rb: RequestBuilder, target: &str) -> AppResult<Response> {
        let resp = rb.send().map_err(|e| {
            error!(target, error = %e, "supabase unreachable");
            AppError::Connection(format!("{}: {}", target, e))
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(AppError::Connection(format!("{} returned {}: {}", target, status, body)));
        }
        Ok(resp)
    }

    /// Send a write. Error statuses are reported as rejected writes.
    fn write(&self, rb: RequestBuilder, target: &str) -> AppResult<()> {
        let resp = rb.send().map_err(|e| {
            error!(target, error = %e, "supabase unreachable");
            AppError::Connection(format!("{}: {}", target, e))
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            error!(target, %status, "supabase rejected write");
            return Err(AppError::Write {
                target: target.to_string(),
                message: format!("{}: {}", status, body),
            });
        }
        Ok(())
    }

    fn insert<T: Serialize>(&self, table: &str, rows: &[T], upsert_on: Option<&str>) -> AppResult<()> {
        let mut rb = self.request(Method::POST, table).json(rows);

        rb = match upsert_on {
            Some(cols) => rb
                .query(&[("on_conflict", cols)])
                .header("Prefer", "resolution=merge-duplicates,return=minimal"),
            None => rb.header("Prefer", "return=minimal"),
        };

        self.write(rb, table)
    }

    fn delete(&self, table: &str, filter: &[(&str, String)]) -> AppResult<()> {
        let rb = self
            .request(Method::DELETE, table)
            .query(filter)
            .header("Prefer", "return=minimal");
        self.write(rb, table)
    }

    fn select_summaries(&self, query: &[(&str, String)]) -> AppResult<Vec<SummaryRow>> {
        let rb = self
            .request(Method::GET, SUMMARY_TABLE)
            .query(&[("select", "*")])
            .query(query);
        Ok(self.read(rb, SUMMARY_TABLE)?.json()?)
    }
}

impl EmployeeDirectory for SupabaseStore {
    fn fetch_employees(&self) -> AppResult<Vec<EmployeeRecord>> {
        let rb = self
            .request(Method::GET, EMPLOYEE_TABLE)
            .query(&[("select", "id,employee_code,full_name")]);

        let employees: Vec<EmployeeRecord> = self.read(rb, EMPLOYEE_TABLE)?.json()?;
        debug!(count = employees.len(), "fetched employee directory");
        Ok(employees)
    }

    fn find_by_code(&self, code: &str) -> AppResult<Option<EmployeeRecord>> {
        let rb = self.request(Method::GET, EMPLOYEE_TABLE).query(&[
            ("select", "id,employee_code,full_name".to_string()),
            // ilike without wildcards: case-insensitive equality
            ("employee_code", format!("ilike.{}", code)),
        ]);

        let mut found: Vec<EmployeeRecord> = self.read(rb, EMPLOYEE_TABLE)?.json()?;
        Ok(if found.is_empty() {
            None
        } else {
            Some(found.swap_remove(0))
        })
    }
}

impl AttendanceStore for SupabaseStore {
    fn replace_window(
        &mut self,
        window: &SyncWindow,
        raw: &[RawLogRow],
        summaries: &[SummaryRow],
        batch_size: usize,
    ) -> AppResult<WriteStats> {
        self.delete(RAW_TABLE, &raw_window_filter(window))?;
        self.delete(SUMMARY_TABLE, &summary_window_filter(window))?;

        let mut chunks = write_chunked(raw, batch_size, |chunk| {
            self.insert(RAW_TABLE, chunk, None)
        })?;
        chunks += write_chunked(summaries, batch_size, |chunk| {
            self.insert(SUMMARY_TABLE, chunk, Some("employee_id,date"))
        })?;

        Ok(WriteStats {
            raw_deleted: None,
            summaries_deleted: None,
            raw_inserted: raw.len(),
            summaries_upserted: summaries.len(),
            chunks,
        })
    }

    fn summaries_for_employee(&self, employee_id: &EmployeeId) -> AppResult<Vec<SummaryRow>> {
        self.select_summaries(&[
            ("employee_id", format!("eq.{}", employee_id)),
            ("order", "date.desc".to_string()),
        ])
    }

    fn latest_summaries(&self, limit: usize) -> AppResult<Vec<SummaryRow>> {
        self.select_summaries(&[
            ("order", "date.desc".to_string()),
            ("limit", limit.to_string()),
        ])
    }

    fn summaries_in_window(&self, window: &SyncWindow) -> AppResult<Vec<SummaryRow>> {
        let mut query = summary_window_filter(window);
        query.push(("order", "employee_id.asc,date.asc".to_string()));
        self.select_summaries(&query)
    }

    fn describe(&self) -> String {
        format!("supabase:{}", self.base_url)
    }
}


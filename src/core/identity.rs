//! Device user id → employee resolution.
//!
//! Two hops: the static device roster turns a time-clock user id into an
//! employee code, then the employee directory (fetched once per run) turns
//! the code into the directory's internal id.

use crate::errors::AppResult;
use crate::models::employee::{EmployeeId, EmployeeRecord};
use crate::models::punch::{RawPunch, ResolvedPunch};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// Roster of the time-clock device: device user id → employee code.
const DEVICE_ROSTER: &[(i64, &str)] = &[
    (0, "NV010"),
    (1, "NV019"),
    (2, "NV015"),
    (3, "NV012"),
    (4, "NV002"),
    (5, "NV013"),
    (6, "NV009"),
    (7, "NV005"),
    (8, "NV008"),
    (9, "NV001"),
    (10, "NV003"),
    (11, "NV006"),
    (12, "NV017"),
    (13, "NV016"),
    (14, "NV004"),
    (15, "NV014"),
    (16, "NV007"),
    (17, "NV011"),
];

static DEVICE_CODES: LazyLock<HashMap<i64, &'static str>> =
    LazyLock::new(|| DEVICE_ROSTER.iter().copied().collect());

/// Employee code assigned to a device user id, if any.
pub fn device_code(device_user_id: i64) -> Option<&'static str> {
    DEVICE_CODES.get(&device_user_id).copied()
}

/// Device user id registered for an employee code, if any.
pub fn device_for_code(code: &str) -> Option<i64> {
    DEVICE_ROSTER
        .iter()
        .find(|(_, c)| c.eq_ignore_ascii_case(code))
        .map(|(id, _)| *id)
}

/// Source of employee records (code → internal id).
pub trait EmployeeDirectory {
    fn fetch_employees(&self) -> AppResult<Vec<EmployeeRecord>>;

    fn find_by_code(&self, code: &str) -> AppResult<Option<EmployeeRecord>> {
        Ok(self
            .fetch_employees()?
            .into_iter()
            .find(|e| e.employee_code.eq_ignore_ascii_case(code)))
    }
}

/// Why a punch could not be attributed to an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingMiss {
    UnknownDevice(i64),
    UnknownCode(String),
}

impl fmt::Display for MappingMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingMiss::UnknownDevice(id) => write!(f, "device user id {id} is not on the roster"),
            MappingMiss::UnknownCode(code) => {
                write!(f, "employee code {code} is not in the directory")
            }
        }
    }
}

/// Run-scoped resolver. Holds the directory snapshot taken at the start of
/// the run and counts the punches it had to drop.
pub struct IdentityResolver {
    by_code: HashMap<String, EmployeeId>,
    misses: usize,
}

impl IdentityResolver {
    pub fn new(employees: Vec<EmployeeRecord>) -> Self {
        let by_code = employees
            .into_iter()
            .map(|e| (e.employee_code, e.id))
            .collect();

        Self { by_code, misses: 0 }
    }

    /// Fetch the directory once and build a resolver from it.
    pub fn from_directory<D: EmployeeDirectory + ?Sized>(directory: &D) -> AppResult<Self> {
        Ok(Self::new(directory.fetch_employees()?))
    }

    pub fn lookup(&self, device_user_id: i64) -> Result<EmployeeId, MappingMiss> {
        let code = device_code(device_user_id).ok_or(MappingMiss::UnknownDevice(device_user_id))?;

        self.by_code
            .get(code)
            .cloned()
            .ok_or_else(|| MappingMiss::UnknownCode(code.to_string()))
    }

    /// `lookup` with the miss logged and counted instead of returned.
    pub fn resolve(&mut self, device_user_id: i64) -> Option<EmployeeId> {
        match self.lookup(device_user_id) {
            Ok(id) => Some(id),
            Err(miss) => {
                debug!(device_user_id, %miss, "dropping punch");
                self.misses += 1;
                None
            }
        }
    }

    /// Resolve every punch, silently dropping the ones that miss.
    pub fn resolve_all(&mut self, punches: &[RawPunch]) -> Vec<ResolvedPunch> {
        punches
            .iter()
            .filter_map(|p| {
                self.resolve(p.device_user_id)
                    .map(|id| ResolvedPunch::new(id, p.timestamp))
            })
            .collect()
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn known_employees(&self) -> usize {
        self.by_code.len()
    }
}

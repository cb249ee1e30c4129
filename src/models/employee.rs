use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque, stable employee identifier as issued by the employee directory.
///
/// Directories disagree on the JSON type of the id (integer primary keys vs
/// uuids), so both numbers and strings are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EmployeeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => EmployeeId(n.to_string()),
            RawId::Text(s) => EmployeeId(s),
        })
    }
}

/// One row of the employee directory (`employees` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub employee_code: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl EmployeeRecord {
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.employee_code)
    }
}

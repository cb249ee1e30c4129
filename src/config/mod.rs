use crate::core::calculator::hours::HoursPolicy;
use crate::core::report::TimesheetPolicy;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const MASK: &str = "********";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub destination: DestinationConfig,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub policy: HoursPolicy,
    #[serde(default)]
    pub timesheet: TimesheetPolicy,
}

/// Connection parameters of the time-clock database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_driver")]
    pub driver: String,
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default = "default_source_database")]
    pub database: String,
    #[serde(default = "default_trusted")]
    pub trusted_connection: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationKind {
    Sqlite,
    Supabase,
}

/// Where summaries are written and employees are looked up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationConfig {
    #[serde(default = "default_destination_kind")]
    pub kind: DestinationKind,
    /// SQLite destination file (kind = sqlite).
    #[serde(default = "default_destination_database")]
    pub database: String,
    /// Project URL (kind = supabase).
    #[serde(default)]
    pub url: Option<String>,
    /// API key (kind = supabase).
    #[serde(default)]
    pub key: Option<String>,
}

fn default_batch_size() -> usize {
    1000
}
fn default_driver() -> String {
    "sqlite".to_string()
}
fn default_trusted() -> bool {
    true
}
fn default_source_database() -> String {
    Config::config_dir()
        .join("timeclock.sqlite")
        .to_string_lossy()
        .to_string()
}
fn default_destination_kind() -> DestinationKind {
    DestinationKind::Supabase
}
fn default_destination_database() -> String {
    Config::config_dir()
        .join("attendance.sqlite")
        .to_string_lossy()
        .to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            server: None,
            database: default_source_database(),
            trusted_connection: default_trusted(),
            username: None,
            password: None,
        }
    }
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            kind: default_destination_kind(),
            database: default_destination_database(),
            url: None,
            key: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            destination: DestinationConfig::default(),
            batch_size: default_batch_size(),
            policy: HoursPolicy::default(),
            timesheet: TimesheetPolicy::default(),
        }
    }
}

impl SourceConfig {
    /// Human readable target, without secrets.
    pub fn describe(&self) -> String {
        if self.driver.eq_ignore_ascii_case("sqlite") {
            return format!("sqlite:{}", self.database);
        }

        let auth = if self.trusted_connection {
            "trusted".to_string()
        } else {
            format!("user={}", self.username.as_deref().unwrap_or("?"))
        };
        format!(
            "driver={};server={};database={};auth={}",
            self.driver,
            self.server.as_deref().unwrap_or("(default)"),
            self.database,
            auth
        )
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Return the standard configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".attendsync")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("attendsync.conf")
    }

    /// Load the config file (defaults when absent), then apply environment
    /// overrides. Does not validate.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_file);

        let mut cfg = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_yaml::from_str(&content)?
        } else {
            Config::default()
        };

        cfg.apply_env(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()));
        Ok(cfg)
    }

    /// Apply `SQL_*`, `SUPABASE_*` and `ATTENDSYNC_*` overrides.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SQL_DRIVER") {
            self.source.driver = v;
        }
        if let Some(v) = lookup("SQL_SERVER") {
            self.source.server = Some(v);
        }
        if let Some(v) = lookup("SQL_DATABASE") {
            self.source.database = v;
        }
        if let Some(v) = lookup("SQL_USERNAME") {
            self.source.username = Some(v);
        }
        if let Some(v) = lookup("SQL_PASSWORD") {
            self.source.password = Some(v);
        }
        if let Some(flag) = lookup("SQL_TRUSTED_CONNECTION").and_then(|v| parse_flag(&v)) {
            self.source.trusted_connection = flag;
        }

        match lookup("ATTENDSYNC_DESTINATION").map(|v| v.to_ascii_lowercase()) {
            Some(v) if v == "sqlite" => self.destination.kind = DestinationKind::Sqlite,
            Some(v) if v == "supabase" => self.destination.kind = DestinationKind::Supabase,
            _ => {}
        }
        if let Some(v) = lookup("ATTENDSYNC_DEST_DB") {
            self.destination.database = v;
        }
        if let Some(v) = lookup("SUPABASE_URL").or_else(|| lookup("VITE_SUPABASE_URL")) {
            self.destination.url = Some(v);
        }
        if let Some(v) = lookup("SUPABASE_KEY").or_else(|| lookup("VITE_SUPABASE_ANON_KEY")) {
            self.destination.key = Some(v);
        }
        if let Some(n) = lookup("ATTENDSYNC_BATCH_SIZE").and_then(|v| v.trim().parse().ok()) {
            self.batch_size = n;
        }
    }

    /// Startup checks. Missing Supabase credentials are fatal.
    pub fn validate(&self) -> AppResult<()> {
        if self.destination.kind == DestinationKind::Supabase {
            if self.destination.url.is_none() {
                return Err(AppError::MissingCredentials(
                    "SUPABASE_URL is required for the supabase destination".to_string(),
                ));
            }
            if self.destination.key.is_none() {
                return Err(AppError::MissingCredentials(
                    "SUPABASE_KEY is required for the supabase destination".to_string(),
                ));
            }
        }

        if !self.source.trusted_connection && self.source.username.is_none() {
            return Err(AppError::Config(
                "source.username is required when trusted_connection is false".to_string(),
            ));
        }

        if self.batch_size == 0 {
            return Err(AppError::Config("batch_size must be at least 1".to_string()));
        }

        self.policy.validate()?;
        self.timesheet.validate()
    }

    /// Copy safe to print: passwords and keys replaced by a mask.
    pub fn masked(&self) -> Self {
        let mut out = self.clone();
        if out.source.password.is_some() {
            out.source.password = Some(MASK.to_string());
        }
        if out.destination.key.is_some() {
            out.destination.key = Some(MASK.to_string());
        }
        out
    }

    /// Write this configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for attendsync
/// CLI application to sync time-clock punches into daily attendance
#[derive(Parser)]
#[command(
    name = "attendsync",
    version = env!("CARGO_PKG_VERSION"),
    about = "Sync time-clock punches into a daily attendance summary",
    long_about = None
)]
pub struct Cli {
    /// Use this configuration file instead of the default one
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr (RUST_LOG still takes precedence)
    #[arg(global = true, long, short = 'v')]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file and prepare the SQLite destination
    Init,

    /// Show the effective configuration
    Config {
        #[arg(long = "print", help = "Print the configuration (secrets masked)")]
        print_config: bool,
    },

    /// Collect, aggregate and store the attendance of one day
    Sync {
        #[arg(
            long = "date",
            value_name = "YYYY-MM-DD",
            help = "Day to sync (default: today)"
        )]
        date: Option<String>,
    },

    /// Read-only diagnostics on the source and destination
    Check {
        #[command(subcommand)]
        target: CheckTarget,
    },

    /// Print the internal log table of the SQLite destination
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Monthly timesheet built from the stored attendance
    Report {
        #[arg(
            long = "month",
            value_name = "YYYY-MM",
            help = "Month to report (default: current month)"
        )]
        month: Option<String>,

        #[arg(long = "csv", value_name = "FILE", help = "Also export the timesheet as CSV")]
        csv: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum CheckTarget {
    /// Source punches recorded on a day
    Date {
        /// Day to inspect (YYYY-MM-DD)
        date: String,
    },

    /// Newest source punches of a device user id
    Device {
        id: i64,

        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Stored attendance of an employee code (e.g. NV005)
    Employee { code: String },

    /// Most recent stored attendance rows
    Latest {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

impl Commands {
    /// Commands that can run without a valid destination.
    pub fn skips_validation(&self) -> bool {
        matches!(
            self,
            Commands::Init
                | Commands::Config { .. }
                | Commands::Check {
                    target: CheckTarget::Date { .. } | CheckTarget::Device { .. }
                }
        )
    }
}

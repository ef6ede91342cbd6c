//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "packload", version, about = "Shared backpack load service CLI")]
pub struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE", default_value = "etc/packload.toml")]
    pub config: PathBuf,

    /// Emit JSON instead of human-readable output (logs and results)
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a scenario file: seed devices/users/links, then apply claim,
    /// release, and sample events in timestamp order
    Run {
        /// Scenario JSON file
        #[arg(long, value_name = "FILE")]
        scenario: PathBuf,
    },
    /// Replay a scenario, then print a history report for one pairing
    Report {
        /// Scenario JSON file
        #[arg(long, value_name = "FILE")]
        scenario: PathBuf,
        /// User id the report is for
        #[arg(long)]
        user: i64,
        /// Device pairing code
        #[arg(long, value_name = "CODE")]
        device: String,
        /// Report window
        #[command(subcommand)]
        window: ReportWindow,
    },
    /// Replay a scenario, then forecast the load for a future date
    Forecast {
        /// Scenario JSON file
        #[arg(long, value_name = "FILE")]
        scenario: PathBuf,
        /// User id the forecast is for
        #[arg(long)]
        user: i64,
        /// Device pairing code
        #[arg(long, value_name = "CODE")]
        device: String,
        /// Target date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        date: chrono::NaiveDate,
    },
    /// Parse and validate the config, then exit
    SelfCheck,
}

#[derive(Subcommand, Debug)]
pub enum ReportWindow {
    /// The trailing seven days ending with the scenario's last event
    Week,
    /// One calendar day
    Day {
        #[arg(long, value_name = "DATE")]
        date: chrono::NaiveDate,
    },
    /// One calendar month
    Month {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
    },
    /// One calendar year
    Year {
        #[arg(long)]
        year: i32,
    },
    /// An inclusive range of days
    Range {
        #[arg(long, value_name = "DATE")]
        from: chrono::NaiveDate,
        #[arg(long, value_name = "DATE")]
        to: chrono::NaiveDate,
    },
    /// Heaviest and lightest reading on record
    Extremes,
}

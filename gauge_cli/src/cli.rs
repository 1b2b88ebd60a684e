//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "gauges", version, about = "Stepper gauge panel CLI")]
pub struct Cli {
    /// Path to panel config TOML
    #[arg(long, value_name = "FILE", default_value = "etc/gauges.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
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
    /// Validate the config, build every gauge and print its wiring
    SelfCheck,
    /// Home every zeroable gauge and park all needles at their initial positions
    Home,
    /// Home, then drive one gauge to a raw input value
    Set {
        /// Gauge name as declared in [[gauge]]
        #[arg(long)]
        gauge: String,
        /// Raw 16-bit input value
        #[arg(long)]
        value: u16,
        /// Climb rate; its sign picks the turn direction of rotational gauges
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        climb: i32,
        /// Give up after this many run-loop ticks
        #[arg(long, value_name = "N", default_value_t = 1_000_000)]
        max_ticks: u64,
    },
    /// Health check for operational monitoring
    Health,
}

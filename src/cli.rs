use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::config::DATA_DIR_ENV;

/// Local task tracker with table, kanban, calendar and dashboard views.
/// Tasks are stored as JSON in the data directory.
#[derive(Parser)]
#[command(name = "tt", version, about = "Local task tracker with table, kanban, calendar and dashboard views")]
pub struct Cli {
    /// Directory holding tasks.json, task_history.json and config.toml.
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// Path to a config file (defaults to <data-dir>/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

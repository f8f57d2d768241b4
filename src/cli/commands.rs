use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "zw", about = concat!("zenweekly v", env!("CARGO_PKG_VERSION"), " - weekly habits and a focus timer"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List a day's habits (default: the whole week)
    List(ListArgs),
    /// Add a habit to the end of a day
    Add(AddArgs),
    /// Check or uncheck a habit
    Toggle(TaskRefArgs),
    /// Remove a habit
    Delete(TaskRefArgs),
    /// Uncheck every habit in the week
    Reset(ResetArgs),
    /// Show per-day and weekly completion
    Stats,
    /// Run a countdown in the terminal
    Timer(TimerArgs),
    /// View or manage the recovery log
    Recovery(RecoveryCmd),
}

#[derive(Args)]
pub struct ListArgs {
    /// Weekday name, 3-letter abbreviation, or "today"
    pub day: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Weekday name, 3-letter abbreviation, or "today"
    pub day: String,
    /// Habit label
    pub label: String,
    /// Time of day shown next to the habit (default: --:--)
    #[arg(long, default_value = "")]
    pub time: String,
}

#[derive(Args)]
pub struct TaskRefArgs {
    /// Weekday name, 3-letter abbreviation, or "today"
    pub day: String,
    /// Habit id or 1-based position in the day
    pub task: String,
}

#[derive(Args)]
pub struct ResetArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct TimerArgs {
    /// focus, short or long (default: focus)
    pub mode: Option<String>,
}

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove entries older than 30 days
    Prune(RecoveryPruneArgs),
    /// Print the absolute path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove all entries
    #[arg(long)]
    pub all: bool,
}

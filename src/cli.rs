use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed to-do list.
/// Storage defaults to ~/.todo or a directory passed via --db.
#[derive(Parser)]
#[command(name = "todo", version, about = "Minimal task list for the terminal")]
pub struct Cli {
    /// Directory holding the task list file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

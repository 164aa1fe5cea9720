//! # todo - Task List CLI
//!
//! A minimal command-line to-do list with an optional terminal user
//! interface (TUI).
//!
//! ## Key Features
//!
//! - **Fast Capture**: Add a task with one shell command, no forms to fill in
//! - **Optional Categories**: Free-form category labels for loose grouping
//! - **Multiple Interfaces**: Scriptable CLI for automation + interactive TUI
//! - **Completed-Task Filter**: Hide finished tasks without deleting them
//! - **Local File Storage**: A single human-readable JSON file, easy to back up
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive task list
//! todo ui
//!
//! # Add a task via CLI
//! todo add "Buy groceries" --category errands
//!
//! # List open tasks only
//! todo list --hide-completed
//!
//! # Mark a task done (or open again)
//! todo toggle 1756200000000
//! ```
//!
//! ## Installation
//!
//! ```bash
//! git clone <repository-url>
//! cd todo
//! cargo install --path .
//! ```
//!
//! ## Key Commands
//!
//! - `todo ui` - Launch the TUI for visual task management
//! - `todo add <text>` - Create a new task, optionally with `--category`
//! - `todo list` - Print the task table
//! - `todo toggle <id>` - Flip a task between open and completed
//! - `todo edit <id> <text>` - Replace a task's text
//! - `todo remove <id>` - Delete a task
//!
//! Data is stored locally in `~/.todo/` as a single `tasks.json` file.
//! Point `--db` at another directory to keep separate lists.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod storage;
pub mod store;
pub mod task;
pub mod tui {
    pub mod colors;
    pub mod app;
    pub mod enums;
    pub mod input;
    pub mod run;
}

use cli::Cli;
use cmd::*;
use storage::FileStorage;
use store::TaskStore;

fn main() {
    let cli = Cli::parse();

    // Determine the data directory
    let data_dir = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".todo")
    });
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("Failed to create data directory {}: {}", data_dir.display(), e);
        std::process::exit(1);
    }

    let mut store = TaskStore::load(FileStorage::new(&data_dir));

    match cli.command {
        Commands::Ui => cmd_ui(store),

        Commands::Add { text, category } => cmd_add(&mut store, text, category),

        Commands::List { hide_completed } => cmd_list(&mut store, hide_completed),

        Commands::Toggle { id } => cmd_toggle(&mut store, id),

        Commands::Edit { id, text } => cmd_edit(&mut store, id, text),

        Commands::Remove { id } => cmd_remove(&mut store, id),

        Commands::Completions { shell } => cmd_completions(shell),
    }
}

//! Command implementations for the CLI interface.
//!
//! This module contains the command handlers for the subcommands, from the
//! basic list operations to launching the interactive TUI.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::storage::Storage;
use crate::store::{print_table, TaskStore};
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI.
    Ui,

    /// Add a new task.
    Add {
        /// Task text.
        text: String,
        /// Category label.
        #[arg(long)]
        category: Option<String>,
    },

    /// List tasks.
    List {
        /// Leave out completed tasks.
        #[arg(long)]
        hide_completed: bool,
    },

    /// Flip a task between open and completed.
    Toggle {
        /// Task id (as shown by `list`).
        id: u64,
    },

    /// Replace a task's text.
    Edit {
        /// Task id (as shown by `list`).
        id: u64,
        /// New text.
        text: String,
    },

    /// Remove a task.
    Remove {
        /// Task id (as shown by `list`).
        id: u64,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui<S: Storage>(store: TaskStore<S>) {
    if let Err(e) = run_tui(store) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task to the list.
pub fn cmd_add<S: Storage>(store: &mut TaskStore<S>, text: String, category: Option<String>) {
    let category = category.unwrap_or_default();
    match store.add_task(&text, &category) {
        Ok(Some(id)) => println!("Added task {id}"),
        Ok(None) => {
            eprintln!("Task text cannot be empty.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to save tasks: {e}");
            std::process::exit(1);
        }
    }
}

/// Print the task list, optionally without completed tasks.
pub fn cmd_list<S: Storage>(store: &mut TaskStore<S>, hide_completed: bool) {
    store.set_show_completed(!hide_completed);
    let visible = store.visible_tasks();
    print_table(&visible);
}

/// Toggle a task's completed flag.
pub fn cmd_toggle<S: Storage>(store: &mut TaskStore<S>, id: u64) {
    if store.get(id).is_none() {
        eprintln!("No task with id {id}");
        std::process::exit(1);
    }
    if let Err(e) = store.toggle_completed(id) {
        eprintln!("Failed to save tasks: {e}");
        std::process::exit(1);
    }
    let state = if store.get(id).map_or(false, |t| t.completed) {
        "completed"
    } else {
        "open"
    };
    println!("Task {id} is now {state}");
}

/// Replace a task's text through a full edit session.
pub fn cmd_edit<S: Storage>(store: &mut TaskStore<S>, id: u64, text: String) {
    store.begin_edit(id);
    if store.editing_id() != Some(id) {
        eprintln!("No task with id {id}");
        std::process::exit(1);
    }
    store.update_draft(&text);
    if let Err(e) = store.commit_edit() {
        eprintln!("Failed to save tasks: {e}");
        std::process::exit(1);
    }
    println!("Updated task {id}");
}

/// Remove a task from the list.
pub fn cmd_remove<S: Storage>(store: &mut TaskStore<S>, id: u64) {
    if store.get(id).is_none() {
        eprintln!("No task with id {id}");
        std::process::exit(1);
    }
    if let Err(e) = store.remove_task(id) {
        eprintln!("Failed to save tasks: {e}");
        std::process::exit(1);
    }
    println!("Removed task {id}");
}

/// Generate shell completion scripts on stdout.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;

    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq)]
pub enum AppState {
    TaskList,
    AddTask,
    EditTask,
    Help,
}

/// Which entry-row field owns the keyboard while adding a task.
#[derive(Clone, Copy, PartialEq)]
pub enum AddField {
    Text,
    Category,
}

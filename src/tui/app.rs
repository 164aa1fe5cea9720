//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the screen state,
//! routes keyboard input to the task store, and renders the task table,
//! entry row, and status bar.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::storage::Storage;
use crate::store::{format_checkbox, TaskStore};
use crate::tui::colors::{BLUE, GREEN};
use crate::tui::enums::{AddField, AppState};
use crate::tui::input::InputField;

/// Main application state for the terminal user interface.
///
/// All task, filter, and edit-session state lives in the store; the app
/// only holds presentation state: screen, focus, cursors, selection, and
/// the status message.
pub struct App<S: Storage> {
    state: AppState,
    store: TaskStore<S>,
    table_state: TableState,
    visible_ids: Vec<u64>,
    text_input: InputField,
    category_input: InputField,
    add_focus: AddField,
    edit_input: InputField,
    status_message: String,
}

impl<S: Storage> App<S> {
    /// Create a new App instance around an already-loaded store.
    pub fn new(store: TaskStore<S>) -> Self {
        let mut app = App {
            state: AppState::TaskList,
            store,
            table_state: TableState::default(),
            visible_ids: Vec::new(),
            text_input: InputField::new(),
            category_input: InputField::new(),
            add_focus: AddField::Text,
            edit_input: InputField::new(),
            status_message: String::new(),
        };
        app.refresh_visible();
        app
    }

    /// Rebuild the list of visible task ids from the store.
    ///
    /// Attempts to keep the current selection when the selected task is
    /// still visible, otherwise falls back to the first row.
    fn refresh_visible(&mut self) {
        let old_selected_id = self
            .table_state
            .selected()
            .and_then(|idx| self.visible_ids.get(idx))
            .copied();

        self.visible_ids = self.store.visible_tasks().iter().map(|t| t.id).collect();

        if let Some(old_id) = old_selected_id {
            if let Some(new_idx) = self.visible_ids.iter().position(|&id| id == old_id) {
                self.table_state.select(Some(new_idx));
            } else {
                self.table_state.select(if self.visible_ids.is_empty() {
                    None
                } else {
                    Some(0)
                });
            }
        } else if !self.visible_ids.is_empty() && self.table_state.selected().is_none() {
            self.table_state.select(Some(0));
        } else if self.visible_ids.is_empty() {
            self.table_state.select(None);
        }
    }

    /// Id of the task under the selection bar.
    fn selected_id(&self) -> Option<u64> {
        self.table_state
            .selected()
            .and_then(|idx| self.visible_ids.get(idx))
            .copied()
    }

    /// Move the selection bar to the row showing the given task.
    fn select_id(&mut self, id: u64) {
        if let Some(idx) = self.visible_ids.iter().position(|&v| v == id) {
            self.table_state.select(Some(idx));
        }
    }

    /// Set a status message to display in the status bar.
    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    /// Clear the current status message.
    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Handle keyboard input when in the task list view.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),

            KeyCode::Up => {
                if let Some(selected) = self.table_state.selected() {
                    if selected > 0 {
                        self.table_state.select(Some(selected - 1));
                    }
                } else if !self.visible_ids.is_empty() {
                    self.table_state.select(Some(0));
                }
            }
            KeyCode::Down => {
                if let Some(selected) = self.table_state.selected() {
                    if selected + 1 < self.visible_ids.len() {
                        self.table_state.select(Some(selected + 1));
                    }
                } else if !self.visible_ids.is_empty() {
                    self.table_state.select(Some(0));
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_id() {
                    if let Err(e) = self.store.toggle_completed(id) {
                        self.set_status_message(format!("Error saving: {e}"));
                    } else {
                        self.refresh_visible();
                    }
                }
            }
            KeyCode::Char('a') => {
                self.text_input.clear();
                self.category_input.clear();
                self.add_focus = AddField::Text;
                self.state = AppState::AddTask;
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_id() {
                    self.store.begin_edit(id);
                    if self.store.editing_id() == Some(id) {
                        self.edit_input = InputField::with_value(self.store.draft_text());
                        self.state = AppState::EditTask;
                    }
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    if let Err(e) = self.store.remove_task(id) {
                        self.set_status_message(format!("Error saving: {e}"));
                    } else {
                        self.refresh_visible();
                        self.set_status_message(format!("Removed task {id}"));
                    }
                }
            }
            KeyCode::Char('t') => {
                let show = !self.store.show_completed();
                self.store.set_show_completed(show);
                self.refresh_visible();
                self.set_status_message(if show {
                    format!("Showing all tasks ({} total)", self.visible_ids.len())
                } else {
                    format!("Hiding completed tasks ({} visible)", self.visible_ids.len())
                });
            }
            KeyCode::Char('h') | KeyCode::F(1) => {
                self.state = AppState::Help;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input while the entry row is active.
    fn handle_add_input(&mut self, key: KeyCode) -> io::Result<bool> {
        match key {
            KeyCode::Esc => {
                self.text_input.clear();
                self.category_input.clear();
                self.state = AppState::TaskList;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.add_focus = match self.add_focus {
                    AddField::Text => AddField::Category,
                    AddField::Category => AddField::Text,
                };
            }
            KeyCode::Enter => {
                match self
                    .store
                    .add_task(&self.text_input.value, &self.category_input.value)
                {
                    Ok(Some(id)) => {
                        self.text_input.clear();
                        self.category_input.clear();
                        self.state = AppState::TaskList;
                        self.refresh_visible();
                        self.select_id(id);
                        self.set_status_message(format!("Added task {id}"));
                    }
                    Ok(None) => {
                        self.set_status_message("Task text cannot be empty".to_string());
                    }
                    Err(e) => {
                        self.set_status_message(format!("Error saving: {e}"));
                    }
                }
            }
            KeyCode::Backspace => self.focused_field_mut().handle_backspace(),
            KeyCode::Delete => self.focused_field_mut().handle_delete(),
            KeyCode::Left => self.focused_field_mut().move_cursor_left(),
            KeyCode::Right => self.focused_field_mut().move_cursor_right(),
            KeyCode::Char(c) => self.focused_field_mut().handle_char(c),
            _ => {}
        }
        Ok(false)
    }

    fn focused_field_mut(&mut self) -> &mut InputField {
        match self.add_focus {
            AddField::Text => &mut self.text_input,
            AddField::Category => &mut self.category_input,
        }
    }

    /// Handle keyboard input while a task is being edited.
    ///
    /// Every change to the input is mirrored into the store's draft, so the
    /// table row shows the live draft while typing.
    fn handle_edit_input(&mut self, key: KeyCode) -> io::Result<bool> {
        match key {
            KeyCode::Esc => {
                self.store.cancel_edit();
                self.state = AppState::TaskList;
            }
            KeyCode::Enter => {
                if let Err(e) = self.store.commit_edit() {
                    self.set_status_message(format!("Error saving: {e}"));
                }
                self.state = AppState::TaskList;
                self.refresh_visible();
            }
            KeyCode::Backspace => {
                self.edit_input.handle_backspace();
                self.store.update_draft(&self.edit_input.value);
            }
            KeyCode::Delete => {
                self.edit_input.handle_delete();
                self.store.update_draft(&self.edit_input.value);
            }
            KeyCode::Left => self.edit_input.move_cursor_left(),
            KeyCode::Right => self.edit_input.move_cursor_right(),
            KeyCode::Char(c) => {
                self.edit_input.handle_char(c);
                self.store.update_draft(&self.edit_input.value);
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input on the help screen.
    fn handle_help_input(&mut self, _key: KeyCode) -> io::Result<bool> {
        self.state = AppState::TaskList;
        Ok(false)
    }

    /// Poll for the next key event and dispatch it to the current screen.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.clear_status_message();

                let should_quit = match self.state {
                    AppState::TaskList => self.handle_task_list_input(key.code, key.modifiers)?,
                    AppState::AddTask => self.handle_add_input(key.code)?,
                    AppState::EditTask => self.handle_edit_input(key.code)?,
                    AppState::Help => self.handle_help_input(key.code)?,
                };
                if should_quit {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Render the header bar with task counts.
    fn render_header(&mut self, f: &mut Frame, area: Rect) {
        let total = self.store.tasks().len();
        let done = self.store.tasks().iter().filter(|t| t.completed).count();
        let context_display = if self.store.show_completed() {
            format!("{} open / {} done", total - done, done)
        } else {
            format!("{} open / {} done (completed hidden)", total - done, done)
        };
        let header_text = vec![Line::from(vec![
            Span::styled("TASK LIST", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                context_display,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::ITALIC),
            ),
        ])];

        let header_block = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header_block, area);
    }

    /// Render the entry row: the new-task boxes, or the edit box while an
    /// edit session is active.
    fn render_entry_row(&mut self, f: &mut Frame, area: Rect) {
        if self.state == AppState::EditTask {
            let edit_box = Paragraph::new(self.edit_input.value.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Edit task (Enter saves, Esc cancels)")
                    .border_style(Style::default().fg(BLUE)),
            );
            f.render_widget(edit_box, area);
            f.set_cursor_position((area.x + self.edit_input.cursor as u16 + 1, area.y + 1));
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)].as_ref())
            .split(area);

        let adding = self.state == AppState::AddTask;
        let text_style = if adding && self.add_focus == AddField::Text {
            Style::default().fg(GREEN)
        } else {
            Style::default()
        };
        let category_style = if adding && self.add_focus == AddField::Category {
            Style::default().fg(GREEN)
        } else {
            Style::default()
        };

        let text_title = if adding { "New task" } else { "New task (press 'a')" };
        let text_box = Paragraph::new(self.text_input.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(text_title)
                .border_style(text_style),
        );
        f.render_widget(text_box, chunks[0]);

        let category_box = Paragraph::new(self.category_input.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Category")
                .border_style(category_style),
        );
        f.render_widget(category_box, chunks[1]);

        if adding {
            let (chunk, field) = match self.add_focus {
                AddField::Text => (chunks[0], &self.text_input),
                AddField::Category => (chunks[1], &self.category_input),
            };
            f.set_cursor_position((chunk.x + field.cursor as u16 + 1, chunk.y + 1));
        }
    }

    /// Render the task table. Completed tasks are dimmed and crossed out;
    /// the row under edit shows the live draft instead of the saved text.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let header_cells = ["", "Task", "Category"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .height(1);

        let editing_id = self.store.editing_id();
        let rows: Vec<Row> = self
            .visible_ids
            .iter()
            .filter_map(|&id| self.store.get(id))
            .map(|task| {
                let style = if task.completed {
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(Color::White)
                };

                let text = if editing_id == Some(task.id) {
                    self.store.draft_text().to_string()
                } else {
                    task.text.clone()
                };

                Row::new(vec![
                    Cell::from(format_checkbox(task.completed)),
                    Cell::from(text),
                    Cell::from(task.category.clone()),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(3),  // Checkbox
            Constraint::Min(25),    // Task text
            Constraint::Length(16), // Category
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Tasks ({}/{})",
                self.visible_ids.len(),
                self.store.tasks().len()
            )))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    /// Render the help screen with keyboard shortcuts.
    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from(vec![Span::styled(
                "Task List Help",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Task list:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from("  Up/Down      Navigate tasks"),
            Line::from("  Space/Enter  Toggle completion"),
            Line::from("  a            Add a new task"),
            Line::from("  e            Edit the selected task"),
            Line::from("  x/Delete     Remove the selected task"),
            Line::from("  t            Show/hide completed tasks"),
            Line::from("  h/F1         Show this help"),
            Line::from("  q/Esc/Ctrl+C Quit"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Entry row:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from("  Tab          Switch between task and category"),
            Line::from("  Enter        Add the task"),
            Line::from("  Esc          Cancel"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Edit box:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from("  Enter        Save the new text"),
            Line::from("  Esc          Cancel without saving"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return"),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => {
                    format!("Tasks: {} | Press 'h' for help", self.visible_ids.len())
                }
                AppState::AddTask => {
                    "Add task: Tab switches fields, Enter adds, Esc cancels".to_string()
                }
                AppState::EditTask => "Edit task: Enter saves, Esc cancels".to_string(),
                AppState::Help => "Help".to_string(),
            }
        };

        let bg = match self.state {
            AppState::AddTask => GREEN,
            AppState::EditTask => BLUE,
            _ => Color::Blue,
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(bg).fg(Color::White))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    /// Main render function that dispatches to the appropriate views.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
            .split(f.area());

        match self.state {
            AppState::Help => self.render_help(f, chunks[0]),
            _ => {
                let main_chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3), // Header
                        Constraint::Length(3), // Entry row
                        Constraint::Min(0),    // Task table
                    ])
                    .split(chunks[0]);

                self.render_header(f, main_chunks[0]);
                self.render_entry_row(f, main_chunks[1]);
                self.render_task_list(f, main_chunks[2]);
            }
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

//! Task store and related functionality.
//!
//! This module provides the `TaskStore` struct that owns the task list, the
//! visibility filter, and the edit-in-progress state, along with the table
//! printer used by the CLI.

use std::io;

use chrono::Utc;

use crate::storage::{Storage, TASKS_KEY};
use crate::task::Task;

/// In-memory task list bound to an injected durable storage backend.
///
/// Every mutating operation writes the full serialized list back to storage
/// before returning. Reads (`visible_tasks`, accessors) never touch storage.
///
/// At most one task can be in edit mode at a time. The draft text is kept
/// separate from the committed text until `commit_edit`; note that adding a
/// task rejects blank text while committing an edit does not — that
/// asymmetry is intentional and kept as-is.
pub struct TaskStore<S: Storage> {
    storage: S,
    tasks: Vec<Task>,
    editing_id: Option<u64>,
    draft_text: String,
    show_completed: bool,
}

impl<S: Storage> TaskStore<S> {
    /// Load the task list from storage, starting empty when nothing valid is
    /// stored. Never writes back on load and never reports parse failures.
    pub fn load(storage: S) -> Self {
        let tasks = storage
            .get(TASKS_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        TaskStore {
            storage,
            tasks,
            editing_id: None,
            draft_text: String::new(),
            show_completed: true,
        }
    }

    /// Write the full task list back to storage.
    fn persist(&mut self) -> io::Result<()> {
        let data = serde_json::to_string_pretty(&self.tasks)?;
        self.storage.set(TASKS_KEY, &data)
    }

    /// Next task id: creation time in Unix milliseconds, bumped past the
    /// highest existing id so ids stay unique when adds land within the
    /// same millisecond.
    fn next_id(&self) -> u64 {
        let now = Utc::now().timestamp_millis() as u64;
        let floor = self.tasks.iter().map(|t| t.id).max().map_or(0, |m| m + 1);
        now.max(floor)
    }

    /// Append a new task. Returns the new task's id, or `None` without
    /// touching the list when `text` is empty after trimming. The text is
    /// stored as given; trimming is only used for the emptiness check.
    pub fn add_task(&mut self, text: &str, category: &str) -> io::Result<Option<u64>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let id = self.next_id();
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            category: category.to_string(),
            completed: false,
        });
        self.persist()?;
        Ok(Some(id))
    }

    /// Delete the task with the given id, if present.
    pub fn remove_task(&mut self, id: u64) -> io::Result<()> {
        self.tasks.retain(|t| t.id != id);
        self.persist()
    }

    /// Flip the completed flag on the task with the given id, if present.
    pub fn toggle_completed(&mut self, id: u64) -> io::Result<()> {
        if let Some(task) = self.get_mut(id) {
            task.completed = !task.completed;
        }
        self.persist()
    }

    /// Start editing the task with the given id, seeding the draft from its
    /// current text. Unknown ids leave the edit session untouched. Calling
    /// this while another edit is in progress discards that draft and
    /// switches to the new target.
    pub fn begin_edit(&mut self, id: u64) {
        if let Some(task) = self.get(id) {
            self.draft_text = task.text.clone();
            self.editing_id = Some(id);
        }
    }

    /// Replace the draft text. No validation; the empty string is accepted.
    pub fn update_draft(&mut self, text: &str) {
        self.draft_text = text.to_string();
    }

    /// Apply the draft to the task being edited and end the edit session.
    /// The draft is applied verbatim, so an empty draft blanks the task's
    /// text. With no active session this only clears the draft.
    pub fn commit_edit(&mut self) -> io::Result<()> {
        if let Some(id) = self.editing_id {
            let draft = self.draft_text.clone();
            if let Some(task) = self.get_mut(id) {
                task.text = draft;
            }
        }
        self.editing_id = None;
        self.draft_text.clear();
        self.persist()
    }

    /// Discard the draft and end the edit session. Nothing is persisted
    /// since no task changed.
    pub fn cancel_edit(&mut self) {
        self.editing_id = None;
        self.draft_text.clear();
    }

    /// Set whether completed tasks appear in `visible_tasks`. A view
    /// preference only; stored tasks are never touched and the flag is not
    /// persisted.
    pub fn set_show_completed(&mut self, value: bool) {
        self.show_completed = value;
    }

    pub fn show_completed(&self) -> bool {
        self.show_completed
    }

    /// Id of the task currently in edit mode, if any.
    pub fn editing_id(&self) -> Option<u64> {
        self.editing_id
    }

    /// Working copy of the text being edited.
    pub fn draft_text(&self) -> &str {
        &self.draft_text
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Get a task by id.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Tasks in insertion order, with completed tasks filtered out unless
    /// `show_completed` is set. Recomputed on every call.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| self.show_completed || !t.completed)
            .collect()
    }
}

/// Format a completed flag as a checkbox for display.
pub fn format_checkbox(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task]) {
    // Header.
    println!("{:<14} {:<4} {:<16} {}", "ID", "Done", "Category", "Text");
    for t in tasks {
        let category = if t.category.is_empty() {
            "-".to_string()
        } else {
            truncate(&t.category, 16)
        };
        println!(
            "{:<14} {:<4} {:<16} {}",
            t.id,
            format_checkbox(t.completed),
            category,
            t.text
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn empty_store() -> TaskStore<MemoryStorage> {
        TaskStore::load(MemoryStorage::new())
    }

    fn add(store: &mut TaskStore<MemoryStorage>, text: &str, category: &str) -> u64 {
        store.add_task(text, category).unwrap().unwrap()
    }

    #[test]
    fn starts_empty_when_storage_is_absent() {
        let store = empty_store();
        assert!(store.tasks().is_empty());
        assert_eq!(store.editing_id(), None);
        assert!(store.show_completed());
    }

    #[test]
    fn starts_empty_when_stored_value_is_malformed() {
        for raw in ["definitely not json", "{\"tasks\": 3}", "[{\"id\": true}]"] {
            let mut storage = MemoryStorage::new();
            storage.set(TASKS_KEY, raw).unwrap();
            let store = TaskStore::load(storage);
            assert!(store.tasks().is_empty(), "should reject {raw:?}");
        }
    }

    #[test]
    fn load_does_not_write_back() {
        let mut storage = MemoryStorage::new();
        storage.set(TASKS_KEY, "garbage").unwrap();
        let _store = TaskStore::load(storage.clone());
        // Whatever was stored stays untouched until the first mutation.
        assert_eq!(storage.get(TASKS_KEY), Some("garbage".to_string()));
    }

    #[test]
    fn add_appends_in_insertion_order() {
        let mut store = empty_store();
        let a = add(&mut store, "first", "");
        let b = add(&mut store, "second", "home");
        let c = add(&mut store, "third", "");
        assert_eq!(store.tasks().len(), 3);
        let ids: Vec<u64> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert_eq!(store.tasks()[1].category, "home");
        assert!(store.tasks().iter().all(|t| !t.completed));
    }

    #[test]
    fn add_rejects_blank_text() {
        let mut store = empty_store();
        assert_eq!(store.add_task("", "").unwrap(), None);
        assert_eq!(store.add_task("   ", "x").unwrap(), None);
        assert_eq!(store.add_task("\t\n", "y").unwrap(), None);
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn add_keeps_text_exactly_as_given() {
        let mut store = empty_store();
        let id = add(&mut store, "  Buy milk  ", "");
        assert_eq!(store.get(id).unwrap().text, "  Buy milk  ");
    }

    #[test]
    fn ids_stay_unique_and_increasing_for_rapid_adds() {
        let mut store = empty_store();
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(add(&mut store, &format!("task {i}"), ""));
        }
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1], "ids must increase: {ids:?}");
        }
    }

    #[test]
    fn remove_deletes_only_the_matching_task() {
        let mut store = empty_store();
        let a = add(&mut store, "keep", "");
        let b = add(&mut store, "drop", "");
        let c = add(&mut store, "keep too", "");
        store.remove_task(b).unwrap();
        let ids: Vec<u64> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn remove_with_unknown_id_leaves_list_unchanged() {
        let mut store = empty_store();
        add(&mut store, "one", "");
        add(&mut store, "two", "");
        let before: Vec<Task> = store.tasks().to_vec();
        store.remove_task(9_999_999).unwrap();
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn toggle_flips_and_double_toggle_restores() {
        let mut store = empty_store();
        let id = add(&mut store, "task", "");
        store.toggle_completed(id).unwrap();
        assert!(store.get(id).unwrap().completed);
        store.toggle_completed(id).unwrap();
        assert!(!store.get(id).unwrap().completed);
    }

    #[test]
    fn toggle_with_unknown_id_is_a_noop() {
        let mut store = empty_store();
        let id = add(&mut store, "task", "");
        store.toggle_completed(id + 1).unwrap();
        assert!(!store.get(id).unwrap().completed);
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn toggle_does_not_reorder_the_list() {
        let mut store = empty_store();
        let a = add(&mut store, "a", "");
        let b = add(&mut store, "b", "");
        store.toggle_completed(a).unwrap();
        let ids: Vec<u64> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn visible_tasks_excludes_completed_when_hidden() {
        let mut store = empty_store();
        let a = add(&mut store, "open", "");
        let b = add(&mut store, "done", "");
        let c = add(&mut store, "also open", "");
        store.toggle_completed(b).unwrap();

        store.set_show_completed(false);
        let visible: Vec<u64> = store.visible_tasks().iter().map(|t| t.id).collect();
        assert_eq!(visible, vec![a, c]);

        store.set_show_completed(true);
        let visible: Vec<u64> = store.visible_tasks().iter().map(|t| t.id).collect();
        assert_eq!(visible, vec![a, b, c]);
    }

    #[test]
    fn begin_edit_seeds_draft_from_current_text() {
        let mut store = empty_store();
        let id = add(&mut store, "original", "");
        store.begin_edit(id);
        assert_eq!(store.editing_id(), Some(id));
        assert_eq!(store.draft_text(), "original");
    }

    #[test]
    fn begin_edit_with_unknown_id_leaves_session_untouched() {
        let mut store = empty_store();
        let id = add(&mut store, "original", "");

        // From idle: still idle.
        store.begin_edit(id + 1);
        assert_eq!(store.editing_id(), None);

        // Mid-edit: the running session survives.
        store.begin_edit(id);
        store.update_draft("typed so far");
        store.begin_edit(id + 1);
        assert_eq!(store.editing_id(), Some(id));
        assert_eq!(store.draft_text(), "typed so far");
    }

    #[test]
    fn begin_edit_switches_target_discarding_prior_draft() {
        let mut store = empty_store();
        let a = add(&mut store, "first", "");
        let b = add(&mut store, "second", "");
        store.begin_edit(a);
        store.update_draft("half-finished change");
        store.begin_edit(b);
        assert_eq!(store.editing_id(), Some(b));
        assert_eq!(store.draft_text(), "second");
    }

    #[test]
    fn cancel_edit_leaves_text_unchanged() {
        let mut store = empty_store();
        let id = add(&mut store, "original", "");
        store.begin_edit(id);
        store.update_draft("never saved");
        store.cancel_edit();
        assert_eq!(store.editing_id(), None);
        assert_eq!(store.draft_text(), "");
        assert_eq!(store.get(id).unwrap().text, "original");
    }

    #[test]
    fn commit_edit_applies_draft_and_clears_session() {
        let mut store = empty_store();
        let id = add(&mut store, "original", "");
        store.begin_edit(id);
        store.update_draft("new text");
        store.commit_edit().unwrap();
        assert_eq!(store.get(id).unwrap().text, "new text");
        assert_eq!(store.editing_id(), None);
        assert_eq!(store.draft_text(), "");
    }

    #[test]
    fn commit_edit_accepts_an_empty_draft() {
        // Unlike add, commit applies whatever the draft holds.
        let mut store = empty_store();
        let id = add(&mut store, "soon blank", "");
        store.begin_edit(id);
        store.update_draft("");
        store.commit_edit().unwrap();
        assert_eq!(store.get(id).unwrap().text, "");
    }

    #[test]
    fn commit_edit_without_session_changes_nothing() {
        let mut store = empty_store();
        let id = add(&mut store, "untouched", "");
        store.update_draft("stray draft");
        store.commit_edit().unwrap();
        assert_eq!(store.get(id).unwrap().text, "untouched");
        assert_eq!(store.editing_id(), None);
        assert_eq!(store.draft_text(), "");
    }

    #[test]
    fn commit_edit_after_target_was_removed() {
        let mut store = empty_store();
        let a = add(&mut store, "stays", "");
        let b = add(&mut store, "goes", "");
        store.begin_edit(b);
        store.update_draft("pointless");
        store.remove_task(b).unwrap();
        store.commit_edit().unwrap();
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.get(a).unwrap().text, "stays");
        assert_eq!(store.editing_id(), None);
    }

    #[test]
    fn every_mutation_is_immediately_persisted() {
        let storage = MemoryStorage::new();
        let mut store = TaskStore::load(storage.clone());

        let id = add(&mut store, "persist me", "cat");
        assert_eq!(TaskStore::load(storage.clone()).tasks(), store.tasks());

        store.toggle_completed(id).unwrap();
        assert_eq!(TaskStore::load(storage.clone()).tasks(), store.tasks());

        store.begin_edit(id);
        store.update_draft("edited");
        store.commit_edit().unwrap();
        assert_eq!(TaskStore::load(storage.clone()).tasks(), store.tasks());

        store.remove_task(id).unwrap();
        assert!(TaskStore::load(storage).tasks().is_empty());
    }

    #[test]
    fn reload_reproduces_the_exact_list() {
        let storage = MemoryStorage::new();
        let mut store = TaskStore::load(storage.clone());
        add(&mut store, "  raw text ", "Errands");
        let b = add(&mut store, "done one", "");
        store.toggle_completed(b).unwrap();

        let reloaded = TaskStore::load(storage);
        assert_eq!(reloaded.tasks(), store.tasks());
        // The filter and edit session are in-memory state, not data.
        assert!(reloaded.show_completed());
        assert_eq!(reloaded.editing_id(), None);
    }

    #[test]
    fn grocery_run_end_to_end() {
        let mut store = empty_store();
        let id = add(&mut store, "Buy milk", "Shopping");

        let task = store.get(id).unwrap();
        assert_eq!(task.text, "Buy milk");
        assert_eq!(task.category, "Shopping");
        assert!(!task.completed);

        store.toggle_completed(id).unwrap();
        assert!(store.get(id).unwrap().completed);

        store.set_show_completed(false);
        assert!(store.visible_tasks().is_empty());
    }

    #[test]
    fn checkbox_formatting() {
        assert_eq!(format_checkbox(true), "[x]");
        assert_eq!(format_checkbox(false), "[ ]");
    }

    #[test]
    fn truncate_respects_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
        assert_eq!(truncate("a very long category name", 10), "a very lo…");
    }
}

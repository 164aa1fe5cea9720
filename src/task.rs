//! Task data structure.
//!
//! This module defines the `Task` record that the store keeps in memory and
//! persists to durable storage as self-describing JSON.

use serde::{Deserialize, Serialize};

/// A single to-do item.
///
/// `id` is the creation time in Unix milliseconds and serves as the sole
/// identity key. `text` is stored exactly as the user entered it; trimming
/// only happens for the emptiness check when a task is added. An empty
/// `category` means "no category".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub category: String,
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn persisted_shape_keeps_field_names() {
        let task = Task {
            id: 1_700_000_000_000,
            text: "Buy milk".to_string(),
            category: "Shopping".to_string(),
            completed: false,
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1_700_000_000_000u64,
                "text": "Buy milk",
                "category": "Shopping",
                "completed": false,
            })
        );
    }

    #[test]
    fn record_missing_a_field_fails_to_parse() {
        // No defaulting: a wrong-shape record must fail the whole-list parse
        // so the store can fall back to an empty list.
        let raw = r#"[{"id": 1, "text": "half a task", "category": ""}]"#;
        assert!(serde_json::from_str::<Vec<Task>>(raw).is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let task = Task {
            id: 42,
            text: "  padded text  ".to_string(),
            category: String::new(),
            completed: true,
        };
        let raw = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, task);
    }
}

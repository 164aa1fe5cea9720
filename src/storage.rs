//! Durable key-value storage backends.
//!
//! The store does not touch the filesystem directly; it talks to a small
//! `get`/`set` interface so the real file backend can be swapped for an
//! in-memory one in tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Fixed key under which the serialized task list is stored.
pub const TASKS_KEY: &str = "tasks";

/// Durable key-value store the task list is saved to and restored from.
pub trait Storage {
    /// Return the value stored under `key`, or `None` if absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// File-backed storage. Each key maps to `<dir>/<key>.json`.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: &Path) -> Self {
        FileStorage {
            dir: dir.to_path_buf(),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key);
        if !path.exists() {
            return None;
        }
        let mut buf = String::new();
        File::open(&path)
            .and_then(|mut f| f.read_to_string(&mut buf))
            .ok()?;
        Some(buf)
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        let path = self.key_path(key);
        // Atomic-ish write via temp + rename.
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        f.write_all(value.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}

/// In-memory storage used as a test double.
///
/// Clones share the same backing map, so a test can keep a handle, feed it
/// to a store, and later reload a second store from whatever the first one
/// persisted. Single-threaded by design, hence `Rc`.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_storage_returns_none_for_absent_key() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.get(TASKS_KEY), None);
    }

    #[test]
    fn file_storage_round_trips_a_value() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path());
        storage.set(TASKS_KEY, "[]").unwrap();
        assert_eq!(storage.get(TASKS_KEY), Some("[]".to_string()));
        assert!(dir.path().join("tasks.json").exists());
    }

    #[test]
    fn file_storage_overwrites_previous_value() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path());
        storage.set(TASKS_KEY, "first").unwrap();
        storage.set(TASKS_KEY, "second").unwrap();
        assert_eq!(storage.get(TASKS_KEY), Some("second".to_string()));
        // The temp file from the atomic write must not linger.
        assert!(!dir.path().join("tasks.json.tmp").exists());
    }

    #[test]
    fn memory_storage_clones_share_contents() {
        let mut storage = MemoryStorage::new();
        let observer = storage.clone();
        storage.set("k", "v").unwrap();
        assert_eq!(observer.get("k"), Some("v".to_string()));
    }
}

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::todo::Todo;

/// Error type for store writes
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize todos: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Key-value persistence for the root todo list
pub trait Store {
    /// Load the list stored under `key`. Missing or unreadable data loads as empty.
    fn load(&mut self, key: &str) -> Vec<Todo>;

    /// Replace the list stored under `key`
    fn save(&mut self, key: &str, todos: &[Todo]) -> Result<(), StoreError>;

    /// Called with every subtree removed from the list stored under `key`
    fn record_deletion(&mut self, _key: &str, _removed: &[Todo]) {}
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn load(&mut self, key: &str) -> Vec<Todo> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, todos: &[Todo]) -> Result<(), StoreError> {
        (**self).save(key, todos)
    }

    fn record_deletion(&mut self, key: &str, removed: &[Todo]) {
        (**self).record_deletion(key, removed)
    }
}

/// Decode a stored list. Nesting depth is unbounded: the recursion limit is
/// off and the stack grows on demand.
pub fn decode_todos(json: &str) -> Result<Vec<Todo>, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let todos = Vec::<Todo>::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(todos)
}

// ---------------------------------------------------------------------------
// JSON files
// ---------------------------------------------------------------------------

/// One pretty-printed `<key>.json` file per namespace in a data directory.
/// Corrupt files, failed writes and deletions are recorded in the
/// directory's recovery log.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonFileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn log_unreadable(&self, key: &str, error: String, body: String) {
        recovery::log_recovery(
            &self.dir,
            RecoveryEntry::new(RecoveryCategory::Parser, "store file unreadable")
                .field("Key", key)
                .field("Error", error)
                .body(body),
        );
    }
}

impl Store for JsonFileStore {
    fn load(&mut self, key: &str) -> Vec<Todo> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                self.log_unreadable(key, e.to_string(), String::new());
                return Vec::new();
            }
        };
        let content = match String::from_utf8(bytes) {
            Ok(c) => c,
            Err(e) => {
                let raw = String::from_utf8_lossy(e.as_bytes()).into_owned();
                self.log_unreadable(key, e.to_string(), raw);
                return Vec::new();
            }
        };
        if content.trim().is_empty() {
            return Vec::new();
        }

        match decode_todos(&content) {
            Ok(todos) => todos,
            Err(e) => {
                self.log_unreadable(key, e.to_string(), content);
                Vec::new()
            }
        }
    }

    fn save(&mut self, key: &str, todos: &[Todo]) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let mut content = serde_json::to_string_pretty(todos)?;
        content.push('\n');

        if let Err(e) = recovery::atomic_write(&path, content.as_bytes()) {
            recovery::log_recovery(
                &self.dir,
                RecoveryEntry::new(RecoveryCategory::Write, "store write failed")
                    .field("Key", key)
                    .field("Error", e.to_string())
                    .body(content),
            );
            return Err(StoreError::WriteError { path, source: e });
        }
        Ok(())
    }

    fn record_deletion(&mut self, key: &str, removed: &[Todo]) {
        if removed.is_empty() {
            return;
        }
        let body = serde_json::to_string_pretty(removed).unwrap_or_default();
        let noun = if removed.len() == 1 { "todo" } else { "todos" };
        recovery::log_recovery(
            &self.dir,
            RecoveryEntry::new(
                RecoveryCategory::Delete,
                format!("{} {} deleted", removed.len(), noun),
            )
            .field("Key", key)
            .body(body),
        );
    }
}

// ---------------------------------------------------------------------------
// In memory
// ---------------------------------------------------------------------------

/// Store backed by a map of serialized JSON strings, so loads go through the
/// same encoding as the file store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    pub saves: usize,
    pub deleted: Vec<Todo>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed raw stored data for `key`
    pub fn with_raw(mut self, key: &str, raw: &str) -> Self {
        self.entries.insert(key.to_string(), raw.to_string());
        self
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Store for MemoryStore {
    fn load(&mut self, key: &str) -> Vec<Todo> {
        self.entries
            .get(key)
            .and_then(|raw| decode_todos(raw).ok())
            .unwrap_or_default()
    }

    fn save(&mut self, key: &str, todos: &[Todo]) -> Result<(), StoreError> {
        self.entries
            .insert(key.to_string(), serde_json::to_string(todos)?);
        self.saves += 1;
        Ok(())
    }

    fn record_deletion(&mut self, _key: &str, removed: &[Todo]) {
        self.deleted.extend(removed.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::recovery::read_recovery_entries;
    use tempfile::TempDir;

    fn leaf(id: &str, text: &str) -> Todo {
        Todo {
            id: id.into(),
            text: text.into(),
            completed: false,
            children: vec![],
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(tmp.path());
        assert!(store.load("todoList").is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(tmp.path().join("data"));
        let mut parent = leaf("p", "parent");
        parent.children.push(leaf("c", "child"));
        parent.completed = true;
        let todos = vec![parent, leaf("q", "other")];

        store.save("todoList", &todos).unwrap();
        assert!(store.path_for("todoList").exists());
        assert_eq!(store.load("todoList"), todos);
        assert!(store.load("otherKey").is_empty());
    }

    #[test]
    fn test_saved_json_uses_plain_field_names() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(tmp.path());
        store.save("k", &[leaf("a", "A")]).unwrap();
        let raw = fs::read_to_string(store.path_for("k")).unwrap();
        assert!(raw.contains("\"id\": \"a\""));
        assert!(raw.contains("\"text\": \"A\""));
        assert!(raw.contains("\"completed\": false"));
        assert!(raw.contains("\"children\": []"));
    }

    #[test]
    fn test_corrupt_file_loads_empty_and_is_logged() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(tmp.path());
        fs::write(store.path_for("todoList"), "not json {{{").unwrap();

        assert!(store.load("todoList").is_empty());

        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, RecoveryCategory::Parser);
        assert_eq!(entries[0].body, "not json {{{");
    }

    #[test]
    fn test_non_utf8_file_is_logged_lossily() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(tmp.path());
        fs::write(store.path_for("todoList"), b"[{\"id\":\"a\",\"text\":\"caf\xe9\"}]").unwrap();

        assert!(store.load("todoList").is_empty());

        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, RecoveryCategory::Parser);
        assert_eq!(entries[0].body, "[{\"id\":\"a\",\"text\":\"caf\u{FFFD}\"}]");
    }

    #[test]
    fn test_unreadable_path_is_logged() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(tmp.path());
        // a directory where the store file should be
        fs::create_dir_all(store.path_for("todoList")).unwrap();

        assert!(store.load("todoList").is_empty());

        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, RecoveryCategory::Parser);
        assert!(entries[0].fields.iter().any(|(k, _)| k == "Error"));
    }

    #[test]
    fn test_decode_has_no_depth_limit() {
        let mut json = String::new();
        for i in 0..500 {
            json.push_str(&format!("[{{\"id\":\"{}\",\"text\":\"t\",\"children\":", i));
        }
        json.push_str("[]");
        for _ in 0..500 {
            json.push_str("}]");
        }
        let todos = decode_todos(&json).unwrap();
        let mut depth = 0;
        let mut list = &todos;
        while let Some(first) = list.first() {
            depth += 1;
            list = &first.children;
        }
        assert_eq!(depth, 500);
        assert!(decode_todos("[] trailing").is_err());
    }

    #[test]
    fn test_blank_file_loads_empty_without_logging() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(tmp.path());
        fs::write(store.path_for("todoList"), "  \n").unwrap();
        assert!(store.load("todoList").is_empty());
        assert!(read_recovery_entries(tmp.path(), None).is_empty());
    }

    #[test]
    fn test_deletions_are_logged() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(tmp.path());
        store.record_deletion("todoList", &[leaf("a", "gone")]);
        store.record_deletion("todoList", &[]);

        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, RecoveryCategory::Delete);
        assert_eq!(entries[0].description, "1 todo deleted");
        assert!(entries[0].body.contains("\"gone\""));
    }

    #[test]
    fn test_memory_store_round_trip_and_corrupt() {
        let mut store = MemoryStore::new().with_raw("bad", "{oops");
        assert!(store.load("bad").is_empty());
        store.save("good", &[leaf("a", "A")]).unwrap();
        assert_eq!(store.load("good"), vec![leaf("a", "A")]);
        assert_eq!(store.saves, 1);
    }
}

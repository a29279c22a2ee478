use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::models::Task;

/// Slot holding the serialized task list.
pub const TODOS_KEY: &str = "todos";
const SLOT_EXTENSION: &str = "json";

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidKey(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "io error: {err}"),
            StorageError::Json(err) => write!(f, "json error: {err}"),
            StorageError::InvalidKey(key) => write!(f, "invalid storage key: {key:?}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            StorageError::Json(err) => Some(err),
            StorageError::InvalidKey(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        StorageError::Io(value)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        StorageError::Json(value)
    }
}

/// A string-valued key-value store with whole-value reads and writes.
pub trait KeyValueStorage {
    /// `Ok(None)` when the slot has never been written.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One file per slot under `root`, replaced atomically on every write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure_dirs(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    pub fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{SLOT_EXTENSION}")))
    }

    fn write_atomic(&self, path: PathBuf, data: &[u8]) -> Result<(), StorageError> {
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(data)?;
            file.sync_all()?;
        }
        fs::rename(temp_path, path)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut buf = String::new();
        file.read_to_string(&mut buf)?;
        Ok(Some(buf))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        self.write_atomic(path, value.as_bytes())
    }
}

/// Process-local slots; nothing survives the value being dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        Ok(self.slots.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Reads the task slot. A missing, unreadable or unparseable slot yields an empty list.
pub fn load_tasks(storage: &impl KeyValueStorage) -> Vec<Task> {
    let raw = match storage.get_item(TODOS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(error) => {
            log::warn!("task slot unreadable, starting empty: {error}");
            return Vec::new();
        }
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<Task>>(&raw) {
        Ok(tasks) => tasks,
        Err(error) => {
            log::warn!("task slot corrupt, starting empty: {error}");
            Vec::new()
        }
    }
}

/// Overwrites the task slot with the full list.
pub fn save_tasks(storage: &mut impl KeyValueStorage, tasks: &[Task]) -> Result<(), StorageError> {
    let json = serde_json::to_string(tasks)?;
    storage.set_item(TODOS_KEY, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, title: &str, completed: bool) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: format!("about {title}"),
            datetime: "2024-01-01T10:00".to_string(),
            completed,
        }
    }

    #[test]
    fn load_from_empty_storage_returns_empty_list() {
        assert!(load_tasks(&MemoryStorage::new()).is_empty());

        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf());
        assert!(load_tasks(&storage).is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().to_path_buf());
        let tasks = vec![task(1, "a", false), task(2, "b", true)];
        save_tasks(&mut storage, &tasks).unwrap();
        assert_eq!(load_tasks(&storage), tasks);
        assert!(dir.path().join("todos.json").exists());
        assert!(!dir.path().join("todos.tmp").exists());
    }

    #[test]
    fn slot_holds_plain_json_array() {
        let mut storage = MemoryStorage::new();
        save_tasks(&mut storage, &[task(1, "a", false)]).unwrap();
        let raw = storage.get_item(TODOS_KEY).unwrap().expect("slot written");
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
              "id": 1,
              "title": "a",
              "description": "about a",
              "datetime": "2024-01-01T10:00",
              "completed": false
            }])
        );
    }

    #[test]
    fn corrupt_or_blank_slot_degrades_to_empty() {
        let mut storage = MemoryStorage::new();
        storage.set_item(TODOS_KEY, "{not json").unwrap();
        assert!(load_tasks(&storage).is_empty());

        storage.set_item(TODOS_KEY, r#"{"id": 1}"#).unwrap();
        assert!(load_tasks(&storage).is_empty());

        storage.set_item(TODOS_KEY, "").unwrap();
        assert!(load_tasks(&storage).is_empty());
    }

    #[test]
    fn unreadable_slot_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the slot file should be makes the read fail.
        fs::create_dir(dir.path().join("todos.json")).unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf());
        assert!(load_tasks(&storage).is_empty());
    }

    #[test]
    fn write_into_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("missing"));
        let error = save_tasks(&mut storage, &[task(1, "a", false)]).unwrap_err();
        assert!(matches!(error, StorageError::Io(_)));

        storage.ensure_dirs().unwrap();
        save_tasks(&mut storage, &[task(1, "a", false)]).unwrap();
        assert_eq!(load_tasks(&storage).len(), 1);
    }

    #[test]
    fn keys_are_restricted_to_file_safe_names() {
        let mut storage = MemoryStorage::new();
        for key in ["", "../todos", "a/b", "todos.json"] {
            let error = storage.set_item(key, "[]").unwrap_err();
            assert!(matches!(error, StorageError::InvalidKey(_)), "key {key:?}");
        }
        assert!(storage.set_item("todo-list_v1", "[]").is_ok());

        let file_storage = FileStorage::new(PathBuf::from("/tmp"));
        assert!(file_storage.slot_path("../etc").is_err());
        assert_eq!(
            file_storage.slot_path(TODOS_KEY).unwrap(),
            PathBuf::from("/tmp/todos.json")
        );
    }

    #[test]
    fn storage_error_display_includes_cause() {
        let error = StorageError::InvalidKey("a/b".to_string());
        assert_eq!(error.to_string(), "invalid storage key: \"a/b\"");
        let io = StorageError::from(std::io::Error::other("disk full"));
        assert_eq!(io.to_string(), "io error: disk full");
    }
}

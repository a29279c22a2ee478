use std::path::PathBuf;

use crate::models::{StatePayload, Task, TaskId, TaskPatch, Theme};
use crate::storage::{load_tasks, save_tasks, FileStorage, KeyValueStorage, StorageError};

/// Tasks plus theme, written through to `storage` on every task mutation.
///
/// Operations addressing an id match every task carrying that id: `delete_task`
/// removes all of them, `toggle_completion` and `edit_task` change all of them.
/// An unknown id changes nothing, but the list is still persisted.
///
/// A failed write is returned to the caller after the in-memory change has been
/// applied; the in-memory list stays authoritative.
#[derive(Debug)]
pub struct TodoStore<S> {
    storage: S,
    tasks: Vec<Task>,
    theme: Theme,
}

impl TodoStore<FileStorage> {
    pub fn open(data_dir: PathBuf) -> Result<Self, StorageError> {
        let storage = FileStorage::new(data_dir);
        storage.ensure_dirs()?;
        let store = Self::load(storage);
        log::info!(
            "todo store opened dir={} tasks={}",
            store.storage.root().display(),
            store.tasks.len()
        );
        Ok(store)
    }
}

impl<S: KeyValueStorage> TodoStore<S> {
    pub fn load(storage: S) -> Self {
        let tasks = load_tasks(&storage);
        Self {
            storage,
            tasks,
            theme: Theme::default(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn snapshot(&self) -> StatePayload {
        StatePayload {
            tasks: self.tasks.clone(),
            theme: self.theme,
        }
    }

    pub fn add_task(&mut self, task: Task) -> Result<(), StorageError> {
        log::debug!("add task id={}", task.id);
        self.tasks.push(task);
        self.persist()
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<(), StorageError> {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        log::debug!("delete task id={id} removed={}", before - self.tasks.len());
        self.persist()
    }

    pub fn toggle_completion(&mut self, id: TaskId) -> Result<(), StorageError> {
        for task in self.tasks.iter_mut().filter(|task| task.id == id) {
            task.completed = !task.completed;
            log::debug!("toggle task id={id} completed={}", task.completed);
        }
        self.persist()
    }

    pub fn edit_task(&mut self, id: TaskId, patch: TaskPatch) -> Result<(), StorageError> {
        for task in self.tasks.iter_mut().filter(|task| task.id == id) {
            patch.apply(task);
            log::debug!("edit task id={id}");
        }
        self.persist()
    }

    /// Session-only; never written to storage.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        save_tasks(&mut self.storage, &self.tasks).inspect_err(|error| {
            log::error!("failed to persist {} tasks: {error}", self.tasks.len());
        })
    }
}

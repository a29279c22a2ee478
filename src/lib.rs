//! Task list core: a persisted task store and the filter/search/sort view over it.

pub mod collate;
pub mod logging;
pub mod models;
pub mod state;
pub mod storage;
pub mod view;

pub use models::{
    FilterMode, NewTask, StatePayload, Task, TaskId, TaskPatch, TaskValidationError, Theme,
};
pub use state::TodoStore;
pub use storage::{
    load_tasks, save_tasks, FileStorage, KeyValueStorage, MemoryStorage, StorageError, TODOS_KEY,
};
pub use view::derive;

#[cfg(test)]
mod tests {
    use super::*;

    fn buy_milk() -> Task {
        Task {
            id: 1,
            title: "Buy milk".to_string(),
            description: String::new(),
            datetime: "2024-01-01T10:00".to_string(),
            completed: false,
        }
    }

    #[test]
    fn form_to_store_to_view_flow() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TodoStore::open(dir.path().to_path_buf()).unwrap();
        assert!(store.tasks().is_empty());

        store.add_task(buy_milk()).unwrap();
        let shopping = NewTask::new("Go Shopping", "groceries").build().unwrap();
        let shopping_id = shopping.id;
        store.add_task(shopping).unwrap();
        store.toggle_completion(shopping_id).unwrap();

        let filter = FilterMode::parse("ALL");
        let visible = derive(store.tasks(), &filter, "shop");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Go Shopping");

        let completed = derive(store.tasks(), &FilterMode::parse("Completed"), "");
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, shopping_id);

        let reopened = TodoStore::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.tasks(), store.tasks());
    }

    #[test]
    fn editing_a_missing_task_is_silent() {
        let mut store = TodoStore::load(MemoryStorage::new());
        store.add_task(buy_milk()).unwrap();
        store.edit_task(999, TaskPatch::title("ghost")).unwrap();
        assert_eq!(store.tasks(), &[buy_milk()]);
    }
}

//! The board store: sole owner and mutator of the board.
//!
//! Every mutation builds a new [`Board`] from the current one and swaps it in
//! as a fresh `Arc`, then writes the snapshot to storage. Readers holding an
//! earlier `Arc` keep seeing the board as it was, and `Arc::ptr_eq` tells
//! them whether anything changed. Operations on unknown task ids are no-ops
//! and leave the current `Arc` in place.

use crate::{
    config::StoreConfig,
    domain::{Board, BoardFilter, NewTask, Task, TaskId, TaskPatch, TaskPriority, TaskStatus},
    error::Result,
    persistence::BoardPersistence,
    storage::Storage,
};
use std::sync::Arc;

#[cfg(feature = "file-storage")]
use crate::storage::FileStorage;

pub struct BoardStore<S> {
    board: Arc<Board>,
    filter: BoardFilter,
    persistence: BoardPersistence<S>,
    board_title: String,
}

impl<S: Storage> BoardStore<S> {
    /// Opens the store, restoring the board from storage when possible
    pub async fn open(storage: S, config: &StoreConfig) -> Self {
        let persistence = BoardPersistence::new(storage, config.storage_key.clone());

        let board = match persistence.load().await {
            Some(board) => {
                tracing::info!(
                    key = %config.storage_key,
                    tasks = board.task_count(),
                    "restored persisted board"
                );
                board
            }
            None => {
                tracing::info!(key = %config.storage_key, "starting from default board");
                Board::new(config.board_title.clone())
            }
        };

        Self {
            board: Arc::new(board),
            filter: BoardFilter::default(),
            persistence,
            board_title: config.board_title.clone(),
        }
    }

    /// Creates a store around an existing board without reading storage
    pub fn with_board(storage: S, config: &StoreConfig, board: Board) -> Self {
        Self {
            board: Arc::new(board),
            filter: BoardFilter::default(),
            persistence: BoardPersistence::new(storage, config.storage_key.clone()),
            board_title: config.board_title.clone(),
        }
    }

    /// Current board snapshot
    pub fn board(&self) -> Arc<Board> {
        Arc::clone(&self.board)
    }

    pub fn filter(&self) -> BoardFilter {
        self.filter
    }

    /// The board restricted to tasks matching the active filter
    pub fn filtered_board(&self) -> Board {
        self.filter.apply(&self.board)
    }

    /// Creates a task in the column for its status
    ///
    /// Fails with `UnknownColumn` when the board has no column for the
    /// requested status; the board is left unchanged in that case.
    pub async fn create_task(&mut self, new: NewTask) -> Result<TaskId> {
        let task = Task::new(new);
        let id = task.id;
        let code = task.code.clone();
        let status = task.status;

        let next = self.board.with_task_added(task)?;
        self.commit(next).await;

        tracing::debug!(task = %id, %code, %status, "created task");
        Ok(id)
    }

    /// Merges `patch` into the task and refreshes its `updated_at`
    ///
    /// A status change moves the task to the matching column. Unknown ids
    /// are ignored.
    pub async fn update_task(&mut self, id: &TaskId, patch: TaskPatch) -> Result<()> {
        let Some(task) = self.board.find_task(id) else {
            tracing::debug!(task = %id, "update ignored: no such task");
            return Ok(());
        };

        let updated = task.patched(&patch);
        let status = updated.status;
        let next = self.board.with_task_replaced(updated)?;
        self.commit(next).await;

        tracing::debug!(task = %id, %status, "updated task");
        Ok(())
    }

    /// Removes the task from every column. Unknown ids are ignored.
    pub async fn delete_task(&mut self, id: &TaskId) {
        if self.board.find_task(id).is_none() {
            tracing::debug!(task = %id, "delete ignored: no such task");
            return;
        }

        let next = self.board.without_task(id);
        self.commit(next).await;

        tracing::debug!(task = %id, "deleted task");
    }

    /// Moves the task to the column for `status`
    ///
    /// Same outcome as `update_task` with only the status set.
    pub async fn move_task(&mut self, id: &TaskId, status: TaskStatus) -> Result<()> {
        self.update_task(id, TaskPatch::new().status(status)).await
    }

    pub fn set_filter_status(&mut self, status: Option<TaskStatus>) {
        self.filter.status = status;
    }

    pub fn set_filter_priority(&mut self, priority: Option<TaskPriority>) {
        self.filter.priority = priority;
    }

    pub fn clear_filters(&mut self) {
        self.filter = BoardFilter::default();
    }

    /// Replaces the board with an empty default board
    pub async fn reset_board(&mut self) {
        let issues = self.board.validate();
        tracing::info!(issues = issues.len(), "resetting board to default");

        if let Err(error) = self.persistence.clear().await {
            tracing::warn!(key = %self.persistence.key(), %error, "failed to clear persisted board");
        }
        self.commit(Board::new(self.board_title.clone())).await;
    }

    async fn commit(&mut self, board: Board) {
        self.board = Arc::new(board);

        if let Err(error) = self.persistence.save(&self.board).await {
            tracing::warn!(key = %self.persistence.key(), %error, "failed to persist board");
        }
    }
}

#[cfg(feature = "file-storage")]
impl BoardStore<FileStorage> {
    /// Opens a store whose slot lives under the configured `data_dir`
    pub async fn open_file(config: &StoreConfig) -> Self {
        Self::open(FileStorage::from_config(config), config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::BoardError, persistence::encode_snapshot, storage::MemoryStorage};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    async fn new_store() -> BoardStore<MemoryStorage> {
        BoardStore::open(MemoryStorage::new(), &StoreConfig::default()).await
    }

    fn tasks_in(board: &Board, status: TaskStatus) -> Vec<Task> {
        board
            .column_for_status(status)
            .map(|col| col.tasks.clone())
            .unwrap_or_default()
    }

    /// Column membership without timestamps
    fn membership(board: &Board) -> Vec<(TaskStatus, Vec<(TaskId, TaskStatus)>)> {
        board
            .columns
            .iter()
            .map(|col| {
                (
                    col.status,
                    col.tasks.iter().map(|t| (t.id, t.status)).collect(),
                )
            })
            .collect()
    }

    fn assert_column_exclusive(board: &Board) {
        let mut seen = std::collections::HashSet::new();
        for col in &board.columns {
            for task in &col.tasks {
                assert!(seen.insert(task.id), "task {} in two columns", task.id);
                assert_eq!(task.status, col.status);
            }
        }
    }

    struct FailingStorage;

    #[async_trait]
    impl Storage for FailingStorage {
        async fn read_slot(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn write_slot(&self, _key: &str, _value: &str) -> Result<()> {
            Err(BoardError::StorageError("quota exceeded".to_string()))
        }

        async fn remove_slot(&self, _key: &str) -> Result<()> {
            Ok(())
        }

        async fn has_slot(&self, _key: &str) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_create_move_delete_scenario() {
        let mut store = new_store().await;

        let id = store.create_task(NewTask::new("Write spec")).await.unwrap();
        let board = store.board();
        assert_eq!(board.task_count(), 1);
        let todo = tasks_in(&board, TaskStatus::Todo);
        assert_eq!(todo.len(), 1);
        let task = &todo[0];
        assert_eq!(task.id, id);
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(task.description.is_none());
        assert!(task.updated_at.is_none());
        let created_at = task.created_at;

        store.move_task(&id, TaskStatus::Done).await.unwrap();
        let board = store.board();
        assert!(tasks_in(&board, TaskStatus::Todo).is_empty());
        let done = tasks_in(&board, TaskStatus::Done);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, id);
        assert_eq!(done[0].status, TaskStatus::Done);
        assert_eq!(done[0].created_at, created_at);
        assert!(done[0].updated_at.unwrap() >= created_at);

        store.delete_task(&id).await;
        assert_eq!(store.board().task_count(), 0);
    }

    #[tokio::test]
    async fn test_priority_filter_scenario() {
        let mut store = new_store().await;
        store
            .create_task(NewTask::new("low").with_priority(TaskPriority::Low))
            .await
            .unwrap();
        let high = store
            .create_task(NewTask::new("high").with_priority(TaskPriority::High))
            .await
            .unwrap();

        store.set_filter_priority(Some(TaskPriority::High));
        let filtered = store.filtered_board();
        let todo = tasks_in(&filtered, TaskStatus::Todo);
        assert_eq!(todo.len(), 1);
        assert_eq!(todo[0].id, high);

        store.clear_filters();
        assert_eq!(tasks_in(&store.filtered_board(), TaskStatus::Todo).len(), 2);
    }

    #[tokio::test]
    async fn test_status_filter_counts() {
        let mut store = new_store().await;
        store.create_task(NewTask::new("a")).await.unwrap();
        store
            .create_task(NewTask::new("b").with_status(TaskStatus::InProgress))
            .await
            .unwrap();
        store
            .create_task(NewTask::new("c").with_status(TaskStatus::InProgress))
            .await
            .unwrap();

        store.set_filter_status(Some(TaskStatus::InProgress));
        let filtered = store.filtered_board();

        assert!(filtered.tasks().all(|t| t.status == TaskStatus::InProgress));
        assert_eq!(filtered.task_count(), 2);
        assert_eq!(filtered.columns.len(), 3);
    }

    #[tokio::test]
    async fn test_filtered_board_is_pure() {
        let mut store = new_store().await;
        store.create_task(NewTask::new("a")).await.unwrap();
        store.set_filter_status(Some(TaskStatus::Done));

        let before = store.board();
        let first = store.filtered_board();
        let second = store.filtered_board();

        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&before, &store.board()));
        assert_eq!(store.filter(), BoardFilter::new().with_status(TaskStatus::Done));
        assert_eq!(store.board().task_count(), 1);
    }

    #[tokio::test]
    async fn test_filters_are_not_persisted() {
        let storage = MemoryStorage::new();
        let mut store = BoardStore::open(storage.clone(), &StoreConfig::default()).await;

        store.set_filter_priority(Some(TaskPriority::Low));
        store.set_filter_status(Some(TaskStatus::Todo));
        assert!(!storage.has_slot(StoreConfig::DEFAULT_STORAGE_KEY).await);

        store.create_task(NewTask::new("a")).await.unwrap();
        let reopened = BoardStore::open(storage, &StoreConfig::default()).await;
        assert!(!reopened.filter().is_active());
    }

    #[tokio::test]
    async fn test_move_and_update_status_are_equivalent() {
        for target in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done] {
            let mut store = new_store().await;
            let id = store.create_task(NewTask::new("a")).await.unwrap();
            store.create_task(NewTask::new("b")).await.unwrap();
            let start = (*store.board()).clone();

            let config = StoreConfig::default();
            let mut moved = BoardStore::with_board(MemoryStorage::new(), &config, start.clone());
            let mut updated = BoardStore::with_board(MemoryStorage::new(), &config, start);

            moved.move_task(&id, target).await.unwrap();
            updated
                .update_task(&id, TaskPatch::new().status(target))
                .await
                .unwrap();

            assert_eq!(membership(&moved.board()), membership(&updated.board()));
            assert!(moved.board().find_task(&id).unwrap().updated_at.is_some());
            assert!(updated.board().find_task(&id).unwrap().updated_at.is_some());
        }
    }

    #[tokio::test]
    async fn test_update_merges_fields_in_place() {
        let mut store = new_store().await;
        let first = store.create_task(NewTask::new("first")).await.unwrap();
        let second = store.create_task(NewTask::new("second")).await.unwrap();
        let code = store.board().find_task(&first).unwrap().code.clone();

        store
            .update_task(
                &first,
                TaskPatch::new()
                    .title("renamed")
                    .description("details")
                    .priority(TaskPriority::High),
            )
            .await
            .unwrap();

        let todo = tasks_in(&store.board(), TaskStatus::Todo);
        assert_eq!(todo[0].id, first);
        assert_eq!(todo[0].title, "renamed");
        assert_eq!(todo[0].description.as_deref(), Some("details"));
        assert_eq!(todo[0].priority, TaskPriority::High);
        assert_eq!(todo[0].code, code);
        assert!(todo[0].updated_at.is_some());
        assert_eq!(todo[1].id, second);
        assert!(todo[1].updated_at.is_none());
    }

    #[tokio::test]
    async fn test_unknown_ids_are_noops() {
        let storage = MemoryStorage::new();
        let mut store = BoardStore::open(storage.clone(), &StoreConfig::default()).await;
        store.create_task(NewTask::new("a")).await.unwrap();
        let before = store.board();
        let ghost = TaskId::new();

        store
            .update_task(&ghost, TaskPatch::new().title("x"))
            .await
            .unwrap();
        store.move_task(&ghost, TaskStatus::Done).await.unwrap();
        store.delete_task(&ghost).await;

        assert!(Arc::ptr_eq(&before, &store.board()));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let mut store = new_store().await;
        let id = store.create_task(NewTask::new("a")).await.unwrap();
        store.create_task(NewTask::new("b")).await.unwrap();

        store.delete_task(&id).await;
        let once = store.board();
        store.delete_task(&id).await;

        assert!(Arc::ptr_eq(&once, &store.board()));
        assert_eq!(once.task_count(), 1);
        assert!(once.find_task(&id).is_none());
    }

    #[tokio::test]
    async fn test_mutations_replace_snapshot() {
        let mut store = new_store().await;
        let initial = store.board();

        let id = store.create_task(NewTask::new("a")).await.unwrap();
        let created = store.board();
        assert!(!Arc::ptr_eq(&initial, &created));
        assert_eq!(initial.task_count(), 0);

        store.move_task(&id, TaskStatus::InProgress).await.unwrap();
        assert!(!Arc::ptr_eq(&created, &store.board()));
        // The old snapshot still shows the task where it was
        assert_eq!(tasks_in(&created, TaskStatus::Todo).len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_column_is_rejected() {
        let storage = MemoryStorage::new();
        let mut store = BoardStore::open(storage.clone(), &StoreConfig::default()).await;

        let err = store
            .create_task(NewTask::new("a").with_status(TaskStatus::Backlog))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BoardError::UnknownColumn {
                status: TaskStatus::Backlog
            }
        ));
        assert_eq!(store.board().task_count(), 0);

        let id = store.create_task(NewTask::new("b")).await.unwrap();
        let before = store.board();

        assert!(store.move_task(&id, TaskStatus::Backlog).await.is_err());
        assert!(store
            .update_task(&id, TaskPatch::new().status(TaskStatus::Backlog).title("x"))
            .await
            .is_err());

        assert!(Arc::ptr_eq(&before, &store.board()));
        assert_eq!(store.board().find_task(&id).unwrap().title, "b");
    }

    #[tokio::test]
    async fn test_column_exclusivity_over_operation_sequence() {
        let mut store = new_store().await;
        let statuses = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];
        let mut ids = Vec::new();

        for step in 0..60usize {
            match step % 5 {
                0 | 1 => {
                    let status = statuses[step % 3];
                    let id = store
                        .create_task(NewTask::new(format!("task {}", step)).with_status(status))
                        .await
                        .unwrap();
                    ids.push(id);
                }
                2 => {
                    let id = ids[step % ids.len()];
                    store.move_task(&id, statuses[(step / 5) % 3]).await.unwrap();
                }
                3 => {
                    let id = ids[(step * 7) % ids.len()];
                    store
                        .update_task(&id, TaskPatch::new().status(statuses[step % 3]).title("moved"))
                        .await
                        .unwrap();
                }
                _ => {
                    let id = ids[(step * 3) % ids.len()];
                    store.delete_task(&id).await;
                }
            }
            assert_column_exclusive(&store.board());
        }
    }

    #[tokio::test]
    async fn test_every_mutation_is_persisted() {
        let storage = MemoryStorage::new();
        let config = StoreConfig::default();
        let mut store = BoardStore::open(storage.clone(), &config).await;

        let id = store.create_task(NewTask::new("a")).await.unwrap();
        store.move_task(&id, TaskStatus::Done).await.unwrap();

        let persisted = storage.read_slot(&config.storage_key).await.unwrap().unwrap();
        assert_eq!(persisted, encode_snapshot(&store.board()).unwrap());

        let reopened = BoardStore::open(storage, &config).await;
        assert_eq!(*reopened.board(), *store.board());
    }

    #[tokio::test]
    async fn test_open_falls_back_on_invalid_snapshot() {
        let config = StoreConfig {
            board_title: "Fresh".to_string(),
            ..StoreConfig::default()
        };
        let storage = MemoryStorage::with_slot(&config.storage_key, r#"{"board":{"columns":null}}"#);

        let store = BoardStore::open(storage, &config).await;

        assert_eq!(*store.board(), Board::new("Fresh"));
    }

    #[tokio::test]
    async fn test_write_failures_are_swallowed() {
        let mut store = BoardStore::open(FailingStorage, &StoreConfig::default()).await;

        let id = store.create_task(NewTask::new("kept in memory")).await.unwrap();

        assert!(store.board().find_task(&id).is_some());
    }

    #[cfg(feature = "file-storage")]
    #[tokio::test]
    async fn test_open_file_round_trip() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = StoreConfig {
            data_dir: temp_dir.path().join("data"),
            ..StoreConfig::default()
        };

        let mut store = BoardStore::open_file(&config).await;
        assert_eq!(store.board().task_count(), 0);
        let id = store
            .create_task(NewTask::new("on disk").with_priority(TaskPriority::High))
            .await
            .unwrap();
        store.move_task(&id, TaskStatus::InProgress).await.unwrap();

        assert!(config.data_dir.join("kanban-board-storage.json").exists());
        let reopened = BoardStore::open_file(&config).await;
        assert_eq!(*reopened.board(), *store.board());
        assert_eq!(
            tasks_in(&reopened.board(), TaskStatus::InProgress)[0].id,
            id
        );
    }

    #[tokio::test]
    async fn test_reset_board() {
        let storage = MemoryStorage::new();
        let config = StoreConfig::default();
        let mut broken = Board::default();
        broken.columns[0]
            .tasks
            .push(Task::new(NewTask::new("stray").with_status(TaskStatus::Done)));
        let mut store = BoardStore::with_board(storage.clone(), &config, broken);
        assert!(!store.board().is_valid());

        store.reset_board().await;

        assert!(store.board().is_valid());
        assert_eq!(store.board().task_count(), 0);
        assert!(storage.has_slot(&config.storage_key).await);
        let reopened = BoardStore::open(storage, &config).await;
        assert_eq!(*reopened.board(), Board::default());
    }
}

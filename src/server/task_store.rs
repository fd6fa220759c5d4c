//! Task store: persistence layer for A2A tasks.
//!
//! The task store owns every [`Task`] a server knows about. The
//! [`InMemoryTaskStore`] keeps them in a sharded concurrent map; other
//! backends implement the [`TaskStore`] trait.
//!
//! Mutations of a single task go through [`TaskStore::modify`], which must
//! apply the closure atomically with respect to other mutations of the same
//! task. Mutations of different tasks may proceed in parallel.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::error::A2AResult;
use crate::types::{Task, TaskList, TaskStatus};
use crate::utils::DEFAULT_LIST_LIMIT;

/// A mutation applied to one stored task.
pub type TaskMutation = Box<dyn FnOnce(&mut Task) + Send>;

/// A predicate over stored tasks.
pub type TaskPredicate<'a> = &'a (dyn Fn(&Task) -> bool + Send + Sync);

/// Parameters for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskListParams {
    /// Only return tasks in this status.
    pub status: Option<TaskStatus>,

    /// Maximum number of tasks to return. Defaults to 100.
    pub limit: Option<usize>,
}

impl TaskListParams {
    /// Filter by status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Cap the number of returned tasks.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Trait for persisting and retrieving A2A tasks.
///
/// Implementations must be `Send + Sync` for use in async server contexts.
/// All methods take `&self` and use interior mutability for thread safety.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Save or replace a task.
    async fn save(&self, task: Task) -> A2AResult<()>;

    /// Retrieve a task by its ID. Returns `None` if the task does not exist.
    async fn get(&self, task_id: &str) -> A2AResult<Option<Task>>;

    /// Apply `mutation` to the stored task and return the result.
    ///
    /// Returns `None` without calling `mutation` if the task does not exist.
    async fn modify(&self, task_id: &str, mutation: TaskMutation) -> A2AResult<Option<Task>>;

    /// Delete a task. Returns `true` if it existed.
    async fn delete(&self, task_id: &str) -> A2AResult<bool>;

    /// List tasks, filtered by status and truncated to the limit.
    ///
    /// Tasks are ordered by creation time, then id. `total` counts every
    /// stored task, before filtering.
    async fn list(&self, params: &TaskListParams) -> A2AResult<TaskList>;

    /// Number of stored tasks.
    async fn len(&self) -> A2AResult<usize>;

    /// Returns `true` if the store holds no tasks.
    async fn is_empty(&self) -> A2AResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Remove every task matching `predicate`. Returns how many were removed.
    async fn remove_where(&self, predicate: TaskPredicate<'_>) -> A2AResult<usize>;
}

/// In-memory task store backed by a [`DashMap`].
///
/// Suitable for development, testing, and short-lived server instances.
/// All task data is lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<DashMap<String, Task>>,
}

impl InMemoryTaskStore {
    /// Create a new empty in-memory task store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn save(&self, task: Task) -> A2AResult<()> {
        let task_id = task.id.clone();
        let is_new = self.tasks.insert(task_id.clone(), task).is_none();
        debug!(task_id = %task_id, is_new = is_new, "Task saved");
        Ok(())
    }

    async fn get(&self, task_id: &str) -> A2AResult<Option<Task>> {
        let task = self.tasks.get(task_id).map(|entry| entry.value().clone());
        debug!(task_id = %task_id, found = task.is_some(), "Task lookup");
        Ok(task)
    }

    async fn modify(&self, task_id: &str, mutation: TaskMutation) -> A2AResult<Option<Task>> {
        // The shard write lock is held for the whole closure.
        let Some(mut entry) = self.tasks.get_mut(task_id) else {
            debug!(task_id = %task_id, "Modify on missing task");
            return Ok(None);
        };
        mutation(entry.value_mut());
        let task = entry.value().clone();
        drop(entry);
        debug!(task_id = %task_id, status = %task.status, "Task modified");
        Ok(Some(task))
    }

    async fn delete(&self, task_id: &str) -> A2AResult<bool> {
        let removed = self.tasks.remove(task_id).is_some();
        if removed {
            debug!(task_id = %task_id, "Task deleted");
        } else {
            warn!(task_id = %task_id, "Attempted to delete non-existent task");
        }
        Ok(removed)
    }

    async fn list(&self, params: &TaskListParams) -> A2AResult<TaskList> {
        let total = self.tasks.len();
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|entry| params.status.map_or(true, |s| entry.value().status == s))
            .map(|entry| entry.value().clone())
            .collect();

        tasks.sort_by(|a, b| {
            a.created_at_utc()
                .cmp(&b.created_at_utc())
                .then_with(|| a.id.cmp(&b.id))
        });
        tasks.truncate(params.limit.unwrap_or(DEFAULT_LIST_LIMIT));

        debug!(count = tasks.len(), total = total, "Listed tasks");
        Ok(TaskList { tasks, total })
    }

    async fn len(&self) -> A2AResult<usize> {
        Ok(self.tasks.len())
    }

    async fn remove_where(&self, predicate: TaskPredicate<'_>) -> A2AResult<usize> {
        let mut removed = 0;
        self.tasks.retain(|_, task| {
            let matched = predicate(task);
            if matched {
                removed += 1;
            }
            !matched
        });
        debug!(removed = removed, "Tasks removed by predicate");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn task_with_status(status: TaskStatus) -> Task {
        let mut task = Task::new("agent", Map::new());
        task.status = status;
        task
    }

    #[tokio::test]
    async fn save_get_delete() {
        let store = InMemoryTaskStore::new();
        let task = Task::new("agent", Map::new());
        let id = task.id.clone();

        store.save(task.clone()).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), Some(task));
        assert_eq!(store.len().await.unwrap(), 1);

        assert!(store.delete(&id).await.unwrap());
        assert!(!store.delete(&id).await.unwrap());
        assert!(store.get(&id).await.unwrap().is_none());
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn modify_missing_task_returns_none() {
        let store = InMemoryTaskStore::new();
        let result = store
            .modify("missing", Box::new(|task| task.status = TaskStatus::Failed))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn modify_returns_updated_task() {
        let store = InMemoryTaskStore::new();
        let task = Task::new("agent", Map::new());
        let id = task.id.clone();
        store.save(task).await.unwrap();

        let updated = store
            .modify(
                &id,
                Box::new(|task| {
                    task.start();
                }),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Working);
        assert_eq!(store.get(&id).await.unwrap().unwrap().status, TaskStatus::Working);
    }

    #[tokio::test]
    async fn list_limits_and_reports_total() {
        let store = InMemoryTaskStore::new();
        for _ in 0..5 {
            store.save(Task::new("agent", Map::new())).await.unwrap();
        }
        let list = store
            .list(&TaskListParams::default().with_limit(2))
            .await
            .unwrap();
        assert_eq!(list.tasks.len(), 2);
        assert_eq!(list.total, 5);
    }

    #[tokio::test]
    async fn list_filters_by_status_but_total_is_unfiltered() {
        let store = InMemoryTaskStore::new();
        store.save(task_with_status(TaskStatus::Completed)).await.unwrap();
        store.save(task_with_status(TaskStatus::Working)).await.unwrap();
        store.save(task_with_status(TaskStatus::Working)).await.unwrap();

        let list = store
            .list(&TaskListParams::default().with_status(TaskStatus::Working))
            .await
            .unwrap();
        assert_eq!(list.tasks.len(), 2);
        assert!(list.tasks.iter().all(|t| t.status == TaskStatus::Working));
        assert_eq!(list.total, 3);
    }

    #[tokio::test]
    async fn list_orders_by_creation_time() {
        let store = InMemoryTaskStore::new();
        let mut late = Task::new("agent", Map::new());
        late.created_at = "2024-01-02T00:00:00Z".to_string();
        let mut early = Task::new("agent", Map::new());
        early.created_at = "2024-01-01T00:00:00Z".to_string();
        store.save(late.clone()).await.unwrap();
        store.save(early.clone()).await.unwrap();

        let list = store.list(&TaskListParams::default()).await.unwrap();
        assert_eq!(list.tasks[0].id, early.id);
        assert_eq!(list.tasks[1].id, late.id);
    }

    #[tokio::test]
    async fn remove_where_counts_removed() {
        let store = InMemoryTaskStore::new();
        store.save(task_with_status(TaskStatus::Completed)).await.unwrap();
        store.save(task_with_status(TaskStatus::Failed)).await.unwrap();
        store.save(task_with_status(TaskStatus::Working)).await.unwrap();

        let removed = store
            .remove_where(&|task: &Task| task.status.is_terminal())
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.len().await.unwrap(), 1);
    }
}

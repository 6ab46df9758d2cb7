//! Repository port for task persistence and lookup.

use crate::directory::domain::UserId;
use crate::task::domain::{Task, TaskId, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes only if the stored task still has `expected` status.
    ///
    /// This is the compare-and-swap that serializes concurrent lifecycle
    /// transitions on the same task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::StatusConflict`] when another writer moved
    /// it first.
    async fn update_if_status(&self, task: &Task, expected: TaskStatus)
    -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns tasks assigned to `assignee_id`, oldest first.
    async fn find_by_assignee(&self, assignee_id: UserId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns tasks created by `leader_id`, oldest first.
    async fn find_by_leader(&self, leader_id: UserId) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A conditional update lost to a concurrent writer.
    #[error("task {task_id} expected status {expected} but found {actual}")]
    StatusConflict {
        /// Task being updated.
        task_id: TaskId,
        /// Status the writer expected.
        expected: TaskStatus,
        /// Status currently stored.
        actual: TaskStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

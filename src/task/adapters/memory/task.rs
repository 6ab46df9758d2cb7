//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::directory::domain::UserId;
use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(err: PoisonError<T>) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Collects tasks matching `predicate`, ordered by creation time.
fn collect_sorted(tasks: &HashMap<TaskId, Task>, predicate: impl Fn(&Task) -> bool) -> Vec<Task> {
    let mut matching: Vec<Task> = tasks.values().filter(|task| predicate(task)).cloned().collect();
    matching.sort_by_key(|task| (task.created_at(), task.id().into_inner()));
    matching
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut tasks = self.state.write().map_err(poisoned)?;
        if tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update_if_status(
        &self,
        task: &Task,
        expected: TaskStatus,
    ) -> TaskRepositoryResult<()> {
        let mut tasks = self.state.write().map_err(poisoned)?;
        let slot = tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if slot.status() != expected {
            return Err(TaskRepositoryError::StatusConflict {
                task_id: task.id(),
                expected,
                actual: slot.status(),
            });
        }
        *slot = task.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let tasks = self.state.read().map_err(poisoned)?;
        Ok(tasks.get(&id).cloned())
    }

    async fn find_by_assignee(&self, assignee_id: UserId) -> TaskRepositoryResult<Vec<Task>> {
        let tasks = self.state.read().map_err(poisoned)?;
        Ok(collect_sorted(&tasks, |task| task.assignee_id() == assignee_id))
    }

    async fn find_by_leader(&self, leader_id: UserId) -> TaskRepositoryResult<Vec<Task>> {
        let tasks = self.state.read().map_err(poisoned)?;
        Ok(collect_sorted(&tasks, |task| task.leader_id() == leader_id))
    }
}

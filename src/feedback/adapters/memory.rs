//! In-memory feedback store for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::feedback::{
    domain::{Feedback, FeedbackId},
    ports::{FeedbackRepository, FeedbackRepositoryError, FeedbackRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory feedback store keyed by task.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeedbackRepository {
    state: Arc<RwLock<HashMap<TaskId, Feedback>>>,
}

impl InMemoryFeedbackRepository {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(err: PoisonError<T>) -> FeedbackRepositoryError {
    FeedbackRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn store(&self, feedback: &Feedback) -> FeedbackRepositoryResult<()> {
        let mut by_task = self.state.write().map_err(poisoned)?;
        if by_task.contains_key(&feedback.task_id()) {
            return Err(FeedbackRepositoryError::DuplicateForTask(feedback.task_id()));
        }
        by_task.insert(feedback.task_id(), feedback.clone());
        Ok(())
    }

    async fn find_by_task(&self, task_id: TaskId) -> FeedbackRepositoryResult<Option<Feedback>> {
        let by_task = self.state.read().map_err(poisoned)?;
        Ok(by_task.get(&task_id).cloned())
    }

    async fn find_by_id(&self, id: FeedbackId) -> FeedbackRepositoryResult<Option<Feedback>> {
        let by_task = self.state.read().map_err(poisoned)?;
        Ok(by_task.values().find(|feedback| feedback.id() == id).cloned())
    }
}

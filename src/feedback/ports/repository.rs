//! Repository port for feedback persistence.

use crate::feedback::domain::{Feedback, FeedbackId};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for feedback repository operations.
pub type FeedbackRepositoryResult<T> = Result<T, FeedbackRepositoryError>;

/// Feedback persistence contract.
///
/// Implementations enforce at most one feedback per task.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Stores new feedback.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackRepositoryError::DuplicateForTask`] when the task
    /// already has feedback.
    async fn store(&self, feedback: &Feedback) -> FeedbackRepositoryResult<()>;

    /// Finds the feedback for a task.
    async fn find_by_task(&self, task_id: TaskId) -> FeedbackRepositoryResult<Option<Feedback>>;

    /// Finds feedback by identifier.
    async fn find_by_id(&self, id: FeedbackId) -> FeedbackRepositoryResult<Option<Feedback>>;
}

/// Errors returned by feedback repository implementations.
#[derive(Debug, Clone, Error)]
pub enum FeedbackRepositoryError {
    /// The task already has feedback.
    #[error("feedback already exists for task {0}")]
    DuplicateForTask(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl FeedbackRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

//! Lifecycle errors and their stable classification.

use crate::directory::domain::{TaskTypeId, UserId};
use crate::directory::ports::DirectoryRepositoryError;
use crate::feedback::domain::FeedbackDomainError;
use crate::feedback::ports::FeedbackRepositoryError;
use crate::task::domain::{AccessDenied, TaskDomainError, TaskId, TaskStatus};
use crate::task::ports::TaskRepositoryError;
use std::fmt;
use thiserror::Error;

/// Coarse error classes a boundary layer maps to response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The addressed task does not exist.
    NotFound,
    /// The request breaks a domain rule.
    Validation,
    /// The caller may not perform the operation.
    Forbidden,
    /// Reference data the engine depends on is missing.
    Configuration,
    /// A backing store failed.
    Unavailable,
}

impl ErrorKind {
    /// Returns a stable lowercase code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Forbidden => "forbidden",
            Self::Configuration => "configuration",
            Self::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Task validation or transition failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Feedback construction failed.
    #[error(transparent)]
    Feedback(#[from] FeedbackDomainError),

    /// The caller is not allowed to perform the operation.
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The leader does not exist.
    #[error("leader not found: {0}")]
    LeaderNotFound(UserId),

    /// The assignee does not exist.
    #[error("user not found: {0}")]
    AssigneeNotFound(UserId),

    /// The assignee does not report to the leader.
    #[error("user {assignee_id} is not a subordinate of leader {leader_id}")]
    NotSubordinate {
        /// Intended assignee.
        assignee_id: UserId,
        /// Leader creating the task.
        leader_id: UserId,
    },

    /// The task type does not exist.
    #[error("task type not found: {0}")]
    TaskTypeNotFound(TaskTypeId),

    /// A canonical status is absent from the status catalog.
    #[error("status catalog has no entry for {0}")]
    MissingStatus(TaskStatus),

    /// Task repository failure.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// Directory repository failure.
    #[error(transparent)]
    Directory(#[from] DirectoryRepositoryError),

    /// Feedback repository failure.
    #[error(transparent)]
    FeedbackRepository(#[from] FeedbackRepositoryError),
}

impl TaskLifecycleError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TaskNotFound(_) | Self::Repository(TaskRepositoryError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::Domain(_)
            | Self::Feedback(_)
            | Self::LeaderNotFound(_)
            | Self::AssigneeNotFound(_)
            | Self::NotSubordinate { .. }
            | Self::TaskTypeNotFound(_) => ErrorKind::Validation,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::MissingStatus(_) => ErrorKind::Configuration,
            Self::Repository(_) | Self::Directory(_) | Self::FeedbackRepository(_) => {
                ErrorKind::Unavailable
            }
        }
    }

    /// Returns a stable, specific code for the error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Domain(TaskDomainError::EmptyDescription) => "empty_description",
            Self::Domain(TaskDomainError::InvalidEstimate(_)) => "invalid_estimate",
            Self::Domain(TaskDomainError::NotStarted(_)) => "task_not_started",
            Self::Domain(TaskDomainError::AlreadyCompleted(_)) => "task_already_completed",
            Self::Domain(TaskDomainError::InvalidStateTransition { .. }) => {
                "invalid_state_transition"
            }
            Self::Feedback(_) => "invalid_feedback",
            Self::Forbidden(_) => "forbidden",
            Self::TaskNotFound(_) | Self::Repository(TaskRepositoryError::NotFound(_)) => {
                "task_not_found"
            }
            Self::LeaderNotFound(_) => "leader_not_found",
            Self::AssigneeNotFound(_) => "user_not_found",
            Self::NotSubordinate { .. } => "not_subordinate",
            Self::TaskTypeNotFound(_) => "task_type_not_found",
            Self::MissingStatus(_) => "missing_status",
            Self::Repository(_) | Self::Directory(_) | Self::FeedbackRepository(_) => {
                "storage_unavailable"
            }
        }
    }

    /// Returns whether this is the "already completed" rejection.
    #[must_use]
    pub const fn is_already_completed(&self) -> bool {
        matches!(self, Self::Domain(TaskDomainError::AlreadyCompleted(_)))
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

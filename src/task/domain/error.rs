//! Error types for task domain validation and parsing.

use super::{DurationMinutes, TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or transitioning tasks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The estimate is zero or above the supported maximum.
    #[error("estimated duration {0} minutes is out of range (0, 999.99]")]
    InvalidEstimate(DurationMinutes),

    /// Finishing was attempted before the task was started.
    #[error("task {0} not started")]
    NotStarted(TaskId),

    /// The task has already been completed.
    #[error("task {0} already completed")]
    AlreadyCompleted(TaskId),

    /// The requested transition is not permitted by the lifecycle.
    #[error("invalid state transition for task {task_id}: {from} -> {to}")]
    InvalidStateTransition {
        /// Task being transitioned.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing a decimal minute value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid duration '{0}', expected minutes with at most two decimals")]
pub struct ParseDurationError(pub String);

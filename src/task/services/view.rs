//! Versioned response projections for lifecycle operations.

use crate::directory::domain::{StatusId, TaskTypeId, UserId};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Reference to a user inside a task projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    /// User identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
}

/// Reference to a task type inside a task projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskTypeSummary {
    /// Task type identifier.
    pub id: TaskTypeId,
    /// Display name.
    pub name: String,
}

/// Reference to a status inside a task projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    /// Status identifier.
    pub id: StatusId,
    /// Display name.
    pub name: String,
}

/// Task state returned by every lifecycle operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskViewV1 {
    /// Task identifier.
    pub id: TaskId,
    /// Description.
    pub description: String,
    /// Estimate in minutes.
    pub estimated_duration: f64,
    /// Measured duration in minutes, once completed.
    pub actual_duration: Option<f64>,
    /// Start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// End timestamp.
    pub finished_at: Option<DateTime<Utc>>,
    /// Assignee.
    pub assignee: UserSummary,
    /// Leader who created the task.
    pub leader: UserSummary,
    /// Task type.
    #[serde(rename = "type")]
    pub task_type: TaskTypeSummary,
    /// Current catalog status.
    pub status: StatusSummary,
}

/// Task state plus the feedback produced on completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedTaskViewV1 {
    /// Task fields.
    #[serde(flatten)]
    pub task: TaskViewV1,
    /// Score in `1..=5`.
    pub score: u8,
    /// Feedback comment.
    pub comment: String,
}

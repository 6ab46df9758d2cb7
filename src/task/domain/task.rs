//! Task aggregate root.

use super::{DurationMinutes, TaskDomainError, TaskId, TaskStatus};
use crate::directory::domain::{StatusId, TaskTypeId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Assignment details for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Free-text description.
    pub description: String,
    /// Estimated effort.
    pub estimated: DurationMinutes,
    /// User expected to carry out the task.
    pub assignee_id: UserId,
    /// Leader assigning the task.
    pub leader_id: UserId,
    /// Task type catalog entry.
    pub task_type_id: TaskTypeId,
}

/// Result of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The task moved from `Pending` to `InProgress`.
    Started,
    /// The task had already been started; nothing changed.
    AlreadyStarted,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    description: String,
    estimated: DurationMinutes,
    actual: Option<DurationMinutes>,
    assignee_id: UserId,
    leader_id: UserId,
    task_type_id: TaskTypeId,
    status: TaskStatus,
    status_id: StatusId,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted description.
    pub description: String,
    /// Persisted estimate.
    pub estimated: DurationMinutes,
    /// Persisted measured duration, if completed.
    pub actual: Option<DurationMinutes>,
    /// Persisted assignee.
    pub assignee_id: UserId,
    /// Persisted leader.
    pub leader_id: UserId,
    /// Persisted task type.
    pub task_type_id: TaskTypeId,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted status catalog reference.
    pub status_id: StatusId,
    /// Persisted start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Persisted end timestamp.
    pub finished_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a pending task.
    ///
    /// Lifecycle fields always start empty regardless of the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] for a blank description
    /// and [`TaskDomainError::InvalidEstimate`] for a zero or oversized
    /// estimate.
    pub fn assign(
        new_task: NewTask,
        pending_status_id: StatusId,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let description = new_task.description.trim();
        if description.is_empty() {
            return Err(TaskDomainError::EmptyDescription);
        }
        if new_task.estimated.is_zero() || new_task.estimated > DurationMinutes::MAX_ESTIMATE {
            return Err(TaskDomainError::InvalidEstimate(new_task.estimated));
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            description: description.to_owned(),
            estimated: new_task.estimated,
            actual: None,
            assignee_id: new_task.assignee_id,
            leader_id: new_task.leader_id,
            task_type_id: new_task.task_type_id,
            status: TaskStatus::Pending,
            status_id: pending_status_id,
            started_at: None,
            finished_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            description: data.description,
            estimated: data.estimated,
            actual: data.actual,
            assignee_id: data.assignee_id,
            leader_id: data.leader_id,
            task_type_id: data.task_type_id,
            status: data.status,
            status_id: data.status_id,
            started_at: data.started_at,
            finished_at: data.finished_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the estimated duration.
    #[must_use]
    pub const fn estimated(&self) -> DurationMinutes {
        self.estimated
    }

    /// Returns the measured duration once completed.
    #[must_use]
    pub const fn actual(&self) -> Option<DurationMinutes> {
        self.actual
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee_id(&self) -> UserId {
        self.assignee_id
    }

    /// Returns the leader who assigned the task.
    #[must_use]
    pub const fn leader_id(&self) -> UserId {
        self.leader_id
    }

    /// Returns the task type.
    #[must_use]
    pub const fn task_type_id(&self) -> TaskTypeId {
        self.task_type_id
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the status catalog reference.
    #[must_use]
    pub const fn status_id(&self) -> StatusId {
        self.status_id
    }

    /// Returns when work started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns when work finished.
    #[must_use]
    pub const fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Starts work on the task.
    ///
    /// A task that already has a start timestamp is left untouched and
    /// [`StartOutcome::AlreadyStarted`] is returned, so retries are safe.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when an unstarted
    /// task is not `Pending`.
    pub fn start(
        &mut self,
        in_progress_status_id: StatusId,
        clock: &impl Clock,
    ) -> Result<StartOutcome, TaskDomainError> {
        if self.started_at.is_some() {
            return Ok(StartOutcome::AlreadyStarted);
        }
        self.ensure_transition(TaskStatus::InProgress)?;

        let now = clock.utc();
        self.started_at = Some(now);
        self.status = TaskStatus::InProgress;
        self.status_id = in_progress_status_id;
        self.updated_at = now;
        Ok(StartOutcome::Started)
    }

    /// Finishes the task and records the measured duration.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotStarted`] without a start timestamp,
    /// [`TaskDomainError::AlreadyCompleted`] for a completed task, and
    /// [`TaskDomainError::InvalidStateTransition`] for any other status that
    /// cannot move to `Completed`.
    pub fn finish(
        &mut self,
        completed_status_id: StatusId,
        clock: &impl Clock,
    ) -> Result<DurationMinutes, TaskDomainError> {
        let started_at = self.started_at.ok_or(TaskDomainError::NotStarted(self.id))?;
        if self.status == TaskStatus::Completed {
            return Err(TaskDomainError::AlreadyCompleted(self.id));
        }
        self.ensure_transition(TaskStatus::Completed)?;

        let now = clock.utc();
        let actual = DurationMinutes::elapsed(started_at, now);
        self.finished_at = Some(now);
        self.actual = Some(actual);
        self.status = TaskStatus::Completed;
        self.status_id = completed_status_id;
        self.updated_at = now;
        Ok(actual)
    }

    const fn ensure_transition(&self, next: TaskStatus) -> Result<(), TaskDomainError> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.status,
                to: next,
            })
        }
    }
}

//! Service layer for task creation, start and completion.

use super::error::{TaskLifecycleError, TaskLifecycleResult};
use super::view::{FinishedTaskViewV1, StatusSummary, TaskTypeSummary, TaskViewV1, UserSummary};
use crate::directory::domain::{Status, TaskTypeId, User, UserId};
use crate::directory::ports::DirectoryRepository;
use crate::feedback::{
    domain::Feedback,
    ports::{FeedbackPrompt, FeedbackRepository, FeedbackRepositoryError},
    services::FeedbackComposer,
};
use crate::task::{
    domain::{
        Caller, DurationMinutes, NewTask, StartOutcome, Task, TaskAction, TaskDomainError, TaskId,
        TaskStatus, authorize,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;

/// Request payload for assigning a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    leader_id: UserId,
    assignee_id: UserId,
    task_type_id: TaskTypeId,
    description: String,
    estimated: DurationMinutes,
}

impl CreateTaskRequest {
    /// Creates a request with every required field.
    #[must_use]
    pub fn new(
        leader_id: UserId,
        assignee_id: UserId,
        task_type_id: TaskTypeId,
        description: impl Into<String>,
        estimated: DurationMinutes,
    ) -> Self {
        Self {
            leader_id,
            assignee_id,
            task_type_id,
            description: description.into(),
            estimated,
        }
    }
}

/// Completed task together with its feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishTaskOutcome {
    /// Task in its `Completed` state.
    pub task: Task,
    /// Feedback stored for the task.
    pub feedback: Feedback,
}

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, D, F, C>
where
    R: TaskRepository,
    D: DirectoryRepository,
    F: FeedbackRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    directory: Arc<D>,
    feedback: Arc<F>,
    composer: FeedbackComposer,
    clock: Arc<C>,
}

impl<R, D, F, C> TaskLifecycleService<R, D, F, C>
where
    R: TaskRepository,
    D: DirectoryRepository,
    F: FeedbackRepository,
    C: Clock + Send + Sync,
{
    /// Creates a service that comments with the fixed template.
    #[must_use]
    pub const fn new(tasks: Arc<R>, directory: Arc<D>, feedback: Arc<F>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            directory,
            feedback,
            composer: FeedbackComposer::template_only(),
            clock,
        }
    }

    /// Replaces the feedback composer.
    #[must_use]
    pub fn with_composer(mut self, composer: FeedbackComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Assigns a new task from a leader to one of their subordinates.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Forbidden`] unless the caller is the
    /// leader named in the request, a validation error when the leader,
    /// assignee or task type is unknown or the assignee reports to someone
    /// else, and [`TaskLifecycleError::MissingStatus`] when the catalog has
    /// no `Pending` status. Nothing is stored on failure.
    pub async fn create_task(
        &self,
        caller: &Caller,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        authorize(caller, TaskAction::Create, request.leader_id)?;

        self.directory
            .find_user(request.leader_id)
            .await?
            .ok_or(TaskLifecycleError::LeaderNotFound(request.leader_id))?;
        let assignee = self
            .directory
            .find_user(request.assignee_id)
            .await?
            .ok_or(TaskLifecycleError::AssigneeNotFound(request.assignee_id))?;
        if !assignee.reports_to(request.leader_id) {
            return Err(TaskLifecycleError::NotSubordinate {
                assignee_id: request.assignee_id,
                leader_id: request.leader_id,
            });
        }
        self.directory
            .find_task_type(request.task_type_id)
            .await?
            .ok_or(TaskLifecycleError::TaskTypeNotFound(request.task_type_id))?;

        let pending = self.resolve_status(TaskStatus::Pending).await?;
        let task = Task::assign(
            NewTask {
                description: request.description,
                estimated: request.estimated,
                assignee_id: request.assignee_id,
                leader_id: request.leader_id,
                task_type_id: request.task_type_id,
            },
            pending.id(),
            &*self.clock,
        )?;
        self.tasks.store(&task).await?;

        tracing::info!(
            task_id = %task.id(),
            leader_id = %task.leader_id(),
            assignee_id = %task.assignee_id(),
            estimated = %task.estimated(),
            "task assigned"
        );
        Ok(task)
    }

    /// Starts a task on behalf of its assignee.
    ///
    /// Starting an already started task changes nothing and returns it as
    /// stored, so the call is safe to retry. When two starts race, the loser
    /// returns the winner's result.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for an unknown task and
    /// [`TaskLifecycleError::Forbidden`] unless the caller is the assigned
    /// member.
    pub async fn start_task(&self, task_id: TaskId, caller: &Caller) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        authorize(caller, TaskAction::Start, task.assignee_id())?;
        if task.started_at().is_some() {
            tracing::debug!(task_id = %task_id, "task already started");
            return Ok(task);
        }

        let in_progress = self.resolve_status(TaskStatus::InProgress).await?;
        if task.start(in_progress.id(), &*self.clock)? == StartOutcome::AlreadyStarted {
            return Ok(task);
        }

        match self.tasks.update_if_status(&task, TaskStatus::Pending).await {
            Ok(()) => {
                tracing::info!(task_id = %task_id, "task started");
                Ok(task)
            }
            Err(TaskRepositoryError::StatusConflict { actual, .. }) => {
                tracing::debug!(task_id = %task_id, %actual, "concurrent start detected");
                self.load(task_id).await
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Finishes a task on behalf of its assignee and stores its feedback.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for an unknown task,
    /// [`TaskLifecycleError::Forbidden`] unless the caller is the assigned
    /// member, [`TaskDomainError::NotStarted`] before the task has started,
    /// and [`TaskDomainError::AlreadyCompleted`] when the task or its
    /// feedback already exists, including when a concurrent finish wins.
    /// When the feedback cannot be stored the task is put back in progress
    /// and the storage error is returned, so the finish can be retried.
    pub async fn finish_task(
        &self,
        task_id: TaskId,
        caller: &Caller,
    ) -> TaskLifecycleResult<FinishTaskOutcome> {
        let mut task = self.load(task_id).await?;
        authorize(caller, TaskAction::Finish, task.assignee_id())?;
        if task.started_at().is_none() {
            return Err(TaskDomainError::NotStarted(task_id).into());
        }
        if self.feedback.find_by_task(task_id).await?.is_some() {
            return Err(TaskDomainError::AlreadyCompleted(task_id).into());
        }

        let completed = self.resolve_status(TaskStatus::Completed).await?;
        let snapshot = task.clone();
        let actual = task.finish(completed.id(), &*self.clock)?;
        let composed = self
            .composer
            .compose(&FeedbackPrompt {
                description: task.description().to_owned(),
                estimated: task.estimated(),
                actual,
            })
            .await;
        let feedback = Feedback::automatic(task_id, composed.score, composed.comment, &*self.clock)?;

        match self.tasks.update_if_status(&task, TaskStatus::InProgress).await {
            Ok(()) => {}
            Err(TaskRepositoryError::StatusConflict { .. }) => {
                return Err(TaskDomainError::AlreadyCompleted(task_id).into());
            }
            Err(err) => return Err(err.into()),
        }

        match self.feedback.store(&feedback).await {
            Ok(()) => {}
            Err(FeedbackRepositoryError::DuplicateForTask(_)) => {
                return Err(TaskDomainError::AlreadyCompleted(task_id).into());
            }
            Err(err) => {
                self.revert_completion(&snapshot).await;
                return Err(err.into());
            }
        }

        tracing::info!(
            task_id = %task_id,
            estimated = %task.estimated(),
            actual = %actual,
            score = %feedback.score(),
            "task completed"
        );
        Ok(FinishTaskOutcome { task, feedback })
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn find_task(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.tasks.find_by_id(task_id).await?)
    }

    /// Lists tasks assigned to a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn tasks_assigned_to(&self, assignee_id: UserId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.tasks.find_by_assignee(assignee_id).await?)
    }

    /// Lists tasks created by a leader, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn tasks_led_by(&self, leader_id: UserId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.tasks.find_by_leader(leader_id).await?)
    }

    /// Returns the feedback stored for a task, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::FeedbackRepository`] when the lookup
    /// fails.
    pub async fn feedback_for(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Feedback>> {
        Ok(self.feedback.find_by_task(task_id).await?)
    }

    /// Resolves a lifecycle status to its catalog entry by canonical name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::MissingStatus`] when the catalog has not
    /// been seeded with the status.
    pub async fn resolve_status(&self, status: TaskStatus) -> TaskLifecycleResult<Status> {
        self.directory
            .find_status_by_name(status.canonical_name())
            .await?
            .ok_or(TaskLifecycleError::MissingStatus(status))
    }

    /// Projects a task into its response shape, resolving names.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a referenced user or task type has
    /// disappeared and [`TaskLifecycleError::MissingStatus`] when the status
    /// entry is gone.
    pub async fn project(&self, task: &Task) -> TaskLifecycleResult<TaskViewV1> {
        let assignee = self
            .directory
            .find_user(task.assignee_id())
            .await?
            .ok_or(TaskLifecycleError::AssigneeNotFound(task.assignee_id()))?;
        let leader = self
            .directory
            .find_user(task.leader_id())
            .await?
            .ok_or(TaskLifecycleError::LeaderNotFound(task.leader_id()))?;
        let task_type = self
            .directory
            .find_task_type(task.task_type_id())
            .await?
            .ok_or(TaskLifecycleError::TaskTypeNotFound(task.task_type_id()))?;
        let status = self
            .directory
            .find_status(task.status_id())
            .await?
            .ok_or(TaskLifecycleError::MissingStatus(task.status()))?;

        Ok(TaskViewV1 {
            id: task.id(),
            description: task.description().to_owned(),
            estimated_duration: task.estimated().as_f64(),
            actual_duration: task.actual().map(DurationMinutes::as_f64),
            started_at: task.started_at(),
            finished_at: task.finished_at(),
            assignee: summarize(&assignee),
            leader: summarize(&leader),
            task_type: TaskTypeSummary {
                id: task_type.id(),
                name: task_type.name().as_str().to_owned(),
            },
            status: StatusSummary {
                id: status.id(),
                name: status.name().as_str().to_owned(),
            },
        })
    }

    /// Projects a finish outcome, adding score and comment.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`Self::project`].
    pub async fn project_finished(
        &self,
        outcome: &FinishTaskOutcome,
    ) -> TaskLifecycleResult<FinishedTaskViewV1> {
        Ok(FinishedTaskViewV1 {
            task: self.project(&outcome.task).await?,
            score: outcome.feedback.score().value(),
            comment: outcome.feedback.comment().to_owned(),
        })
    }

/// Puts a completed task back to its in-progress snapshot after its
    /// feedback could not be stored, so the finish can be retried.
    async fn revert_completion(&self, snapshot: &Task) {
        match self.tasks.update_if_status(snapshot, TaskStatus::Completed).await {
            Ok(()) => tracing::warn!(
                task_id = %snapshot.id(),
                "feedback write failed, task returned to in progress"
            ),
            Err(err) => tracing::error!(
                task_id = %snapshot.id(),
                error = %err,
                "feedback write failed and the task could not be returned to in progress"
            ),
        }
    }

        async fn load(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }
}

fn summarize(user: &User) -> UserSummary {
    UserSummary {
        id: user.id(),
        username: user.username().as_str().to_owned(),
    }
}

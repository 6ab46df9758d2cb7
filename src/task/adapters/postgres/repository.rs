//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{models::TaskRow, schema::tasks};
use crate::directory::domain::{StatusId, TaskTypeId, UserId};
use crate::persistence::PgPool;
use crate::task::{
    domain::{DurationMinutes, PersistedTaskData, Task, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_if_status(
        &self,
        task: &Task,
        expected: TaskStatus,
    ) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::state.eq(expected.as_str())),
            )
            .set(&row)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            if updated > 0 {
                return Ok(());
            }

            let current = tasks::table
                .filter(tasks::id.eq(task_id.into_inner()))
                .select(tasks::state)
                .first::<String>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            match current {
                None => Err(TaskRepositoryError::NotFound(task_id)),
                Some(state) => Err(TaskRepositoryError::StatusConflict {
                    task_id,
                    expected,
                    actual: TaskStatus::try_from(state.as_str())
                        .map_err(TaskRepositoryError::persistence)?,
                }),
            }
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_by_assignee(&self, assignee_id: UserId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::assignee_id.eq(assignee_id.into_inner()))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_by_leader(&self, leader_id: UserId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::leader_id.eq(leader_id.into_inner()))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_column(duration: DurationMinutes) -> TaskRepositoryResult<i32> {
    i32::try_from(duration.hundredths()).map_err(TaskRepositoryError::persistence)
}

fn from_column(hundredths: i32) -> TaskRepositoryResult<DurationMinutes> {
    u32::try_from(hundredths)
        .map(DurationMinutes::from_hundredths)
        .map_err(TaskRepositoryError::persistence)
}

fn to_row(task: &Task) -> TaskRepositoryResult<TaskRow> {
    Ok(TaskRow {
        id: task.id().into_inner(),
        description: task.description().to_owned(),
        estimated_hundredths: to_column(task.estimated())?,
        actual_hundredths: task.actual().map(to_column).transpose()?,
        assignee_id: task.assignee_id().into_inner(),
        leader_id: task.leader_id().into_inner(),
        task_type_id: task.task_type_id().into_inner(),
        state: task.status().as_str().to_owned(),
        status_id: task.status_id().into_inner(),
        started_at: task.started_at(),
        finished_at: task.finished_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        description,
        estimated_hundredths,
        actual_hundredths,
        assignee_id,
        leader_id,
        task_type_id,
        state,
        status_id,
        started_at,
        finished_at,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        description,
        estimated: from_column(estimated_hundredths)?,
        actual: actual_hundredths.map(from_column).transpose()?,
        assignee_id: UserId::from_uuid(assignee_id),
        leader_id: UserId::from_uuid(leader_id),
        task_type_id: TaskTypeId::from_uuid(task_type_id),
        status: TaskStatus::try_from(state.as_str()).map_err(TaskRepositoryError::persistence)?,
        status_id: StatusId::from_uuid(status_id),
        started_at,
        finished_at,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

//! `PostgreSQL` repository implementation for feedback storage.

use super::{models::FeedbackRow, schema::feedbacks};
use crate::feedback::{
    domain::{Feedback, FeedbackId, PersistedFeedbackData, Score},
    ports::{FeedbackRepository, FeedbackRepositoryError, FeedbackRepositoryResult},
};
use crate::persistence::PgPool;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed feedback store.
#[derive(Debug, Clone)]
pub struct PostgresFeedbackRepository {
    pool: PgPool,
}

impl PostgresFeedbackRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> FeedbackRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> FeedbackRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(FeedbackRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(FeedbackRepositoryError::persistence)?
    }
}

#[async_trait]
impl FeedbackRepository for PostgresFeedbackRepository {
    async fn store(&self, feedback: &Feedback) -> FeedbackRepositoryResult<()> {
        let task_id = feedback.task_id();
        let row = to_row(feedback);

        self.run_blocking(move |connection| {
            // The unique index on `task_id` is the 1:1 guard under concurrency.
            diesel::insert_into(feedbacks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        FeedbackRepositoryError::DuplicateForTask(task_id)
                    }
                    _ => FeedbackRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_task(&self, task_id: TaskId) -> FeedbackRepositoryResult<Option<Feedback>> {
        self.run_blocking(move |connection| {
            let row = feedbacks::table
                .filter(feedbacks::task_id.eq(task_id.into_inner()))
                .select(FeedbackRow::as_select())
                .first::<FeedbackRow>(connection)
                .optional()
                .map_err(FeedbackRepositoryError::persistence)?;
            row.map(row_to_feedback).transpose()
        })
        .await
    }

    async fn find_by_id(&self, id: FeedbackId) -> FeedbackRepositoryResult<Option<Feedback>> {
        self.run_blocking(move |connection| {
            let row = feedbacks::table
                .filter(feedbacks::id.eq(id.into_inner()))
                .select(FeedbackRow::as_select())
                .first::<FeedbackRow>(connection)
                .optional()
                .map_err(FeedbackRepositoryError::persistence)?;
            row.map(row_to_feedback).transpose()
        })
        .await
    }
}

fn to_row(feedback: &Feedback) -> FeedbackRow {
    FeedbackRow {
        id: feedback.id().into_inner(),
        task_id: feedback.task_id().into_inner(),
        score: i16::from(feedback.score()),
        comment: feedback.comment().to_owned(),
        auto_generated: feedback.auto_generated(),
        created_at: feedback.created_at(),
    }
}

fn row_to_feedback(row: FeedbackRow) -> FeedbackRepositoryResult<Feedback> {
    let FeedbackRow {
        id,
        task_id,
        score,
        comment,
        auto_generated,
        created_at,
    } = row;

    let data = PersistedFeedbackData {
        id: FeedbackId::from_uuid(id),
        task_id: TaskId::from_uuid(task_id),
        score: Score::new(score).map_err(FeedbackRepositoryError::persistence)?,
        comment,
        auto_generated,
        created_at,
    };
    Ok(Feedback::from_persisted(data))
}

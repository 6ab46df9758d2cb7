//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for task records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Free-text description.
    pub description: String,
    /// Estimate in hundredths of a minute.
    pub estimated_hundredths: i32,
    /// Measured duration in hundredths of a minute.
    pub actual_hundredths: Option<i32>,
    /// Assignee reference.
    pub assignee_id: uuid::Uuid,
    /// Creating leader reference.
    pub leader_id: uuid::Uuid,
    /// Task type reference.
    pub task_type_id: uuid::Uuid,
    /// Lifecycle state.
    pub state: String,
    /// Status catalog reference.
    pub status_id: uuid::Uuid,
    /// Start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// End timestamp.
    pub finished_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

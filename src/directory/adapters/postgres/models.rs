//! Diesel row models for directory persistence.

use super::schema::{task_statuses, task_types, users};
use diesel::prelude::*;

/// Row model for user records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Unique login name.
    pub username: String,
    /// Opaque credential hash.
    pub credential_hash: String,
    /// Role name.
    pub role: String,
    /// Job function label.
    pub job_function: String,
    /// Leader reference.
    pub leader_id: Option<uuid::Uuid>,
}

/// Row model for task type records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskTypeRow {
    /// Task type identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
}

/// Row model for status records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = task_statuses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StatusRow {
    /// Status identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
}
